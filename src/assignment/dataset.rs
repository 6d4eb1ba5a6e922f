use crate::assignment::{check_percentage, AssignmentError};
use indexmap::{IndexMap, IndexSet};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const PRODUCT_TAG: &str = "Id:";
// misspelled in the dataset itself
const CUSTOMER_TAG: &str = "cutomer:";

/// Customer id -> ids of the products the customer reviewed, both in the order
/// they first appear in the metadata file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewDataset {
    customers: IndexMap<String, IndexSet<String>>,
}

impl ReviewDataset {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AssignmentError> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    pub fn parse<R: BufRead>(reader: R) -> Result<Self, AssignmentError> {
        let mut customers: IndexMap<String, IndexSet<String>> = IndexMap::new();
        let mut product: Option<String> = None;

        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            let mut tokens = line.split_whitespace();

            match tokens.next() {
                Some(PRODUCT_TAG) => {
                    product = tokens.next().map(str::to_owned);
                    continue;
                }
                Some(_) => {}
                None => continue,
            }

            let Some(customer) = line.split_whitespace().skip_while(|&token| token != CUSTOMER_TAG).nth(1) else {
                continue;
            };
            let product = product.as_ref().ok_or(AssignmentError::ReviewWithoutProduct(line_number + 1))?;
            customers.entry(customer.to_owned()).or_default().insert(product.clone());
        }

        debug!("parsed {} customers", customers.len());
        Ok(Self { customers })
    }

    pub fn from_reviews<I, C, P>(reviews: I) -> Self
    where
        I: IntoIterator<Item = (C, P)>,
        C: Into<String>,
        P: Into<String>,
    {
        let mut customers: IndexMap<String, IndexSet<String>> = IndexMap::new();
        for (customer, product) in reviews {
            customers.entry(customer.into()).or_default().insert(product.into());
        }
        Self { customers }
    }

    #[inline]
    pub fn num_customers(&self) -> usize {
        self.customers.len()
    }

    pub fn num_reviews(&self) -> usize {
        self.customers.values().map(IndexSet::len).sum()
    }

    pub fn customers(&self) -> impl Iterator<Item = (&str, &IndexSet<String>)> + '_ {
        self.customers.iter().map(|(customer, products)| (customer.as_str(), products))
    }

    pub fn products_of(&self, customer: &str) -> Option<&IndexSet<String>> {
        self.customers.get(customer)
    }

    /// Drops `outliers`, then keeps the last `percentage` percent of the
    /// remaining customers.
    pub fn retain_percentage(&mut self, percentage: f64, outliers: &[String]) -> Result<(), AssignmentError> {
        let percentage = check_percentage(percentage)?;
        for outlier in outliers {
            self.customers.shift_remove(outlier);
        }

        let keep = (self.customers.len() as f64 * percentage / 100.0) as usize;
        let dropped = self.customers.len() - keep;
        self.customers.drain(..dropped);
        debug!("dropped {} customers, {} left", dropped, keep);
        Ok(())
    }

    /// Product id -> number of customers who reviewed it.
    pub fn product_counts(&self) -> IndexMap<String, usize> {
        let mut counts = IndexMap::new();
        for product in self.customers.values().flatten() {
            *counts.entry(product.clone()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const METADATA: &str = "\
Id:   1
ASIN: 0827229534
  title: Patterns of Preaching
  reviews: total: 2  downloaded: 2  avg rating: 5
    2000-7-28  cutomer: A2JW67OY8U6HHK  rating: 5  votes:  10  helpful:   9
    2003-12-14  cutomer: A2VE83MZF98ITY  rating: 5  votes:   6  helpful:   5

Id:   2
ASIN: 0738700797
  reviews: total: 3  downloaded: 3  avg rating: 4
    2001-12-16  cutomer: A11NCO6YTE4BTJ  rating: 5  votes:   5  helpful:   4
    2002-1-7  cutomer: A2JW67OY8U6HHK  rating: 4  votes:   5  helpful:   5
    2002-1-9  cutomer: A2JW67OY8U6HHK  rating: 3  votes:   1  helpful:   1
";

    #[test]
    fn parse_metadata() {
        let dataset = ReviewDataset::parse(METADATA.as_bytes()).unwrap();

        let customers: Vec<&str> = dataset.customers().map(|(customer, _)| customer).collect();
        assert_eq!(customers, vec!["A2JW67OY8U6HHK", "A2VE83MZF98ITY", "A11NCO6YTE4BTJ"]);
        let products: Vec<&String> = dataset.products_of("A2JW67OY8U6HHK").unwrap().iter().collect();
        assert_eq!(products, vec!["1", "2"]);
        assert_eq!(dataset.num_reviews(), 4);
    }

    #[test]
    fn review_before_product() {
        let text = "  title: nothing\n    2000-7-28  cutomer: A2JW67OY8U6HHK  rating: 5\n";
        assert!(matches!(ReviewDataset::parse(text.as_bytes()), Err(AssignmentError::ReviewWithoutProduct(2))));
    }

    #[test]
    fn product_counts_follow_first_appearance() {
        let dataset = ReviewDataset::from_reviews([("c1", "p2"), ("c1", "p1"), ("c2", "p1"), ("c3", "p1")]);
        let counts: Vec<(String, usize)> = dataset.product_counts().into_iter().collect();
        assert_eq!(counts, vec![("p2".to_string(), 1), ("p1".to_string(), 3)]);
    }

    #[rstest]
    #[case(100.0, vec!["c1", "c2", "c3", "c4"])]
    #[case(50.0, vec!["c3", "c4"])]
    #[case(30.0, vec!["c4"])]
    #[case(0.0, vec![])]
    fn retain_keeps_the_tail(#[case] percentage: f64, #[case] expected: Vec<&str>) {
        let mut dataset = ReviewDataset::from_reviews([("c1", "p"), ("x", "p"), ("c2", "p"), ("c3", "p"), ("c4", "p")]);
        dataset.retain_percentage(percentage, &["x".to_string(), "absent".to_string()]).unwrap();

        let customers: Vec<&str> = dataset.customers().map(|(customer, _)| customer).collect();
        assert_eq!(customers, expected);
    }

    #[rstest]
    #[case(-1.0)]
    #[case(100.5)]
    #[case(f64::NAN)]
    fn retain_rejects_bad_percentage(#[case] percentage: f64) {
        let mut dataset = ReviewDataset::from_reviews([("c1", "p")]);
        assert!(matches!(dataset.retain_percentage(percentage, &[]), Err(AssignmentError::InvalidPercentage(_))));
        assert_eq!(dataset.num_customers(), 1);
    }
}
