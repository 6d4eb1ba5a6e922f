use crate::assignment::dataset::ReviewDataset;
use crate::assignment::{check_percentage, check_share, AssignmentConfig, AssignmentError};
use crate::maximum_flow::graph::{EdgeId, Graph};
use crate::maximum_flow::push_relabel::{PushRelabel, SINK, SOURCE};
use indexmap::IndexMap;
use log::info;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Review {
    pub customer: String,
    pub product: String,
}

/// Sums over the capacities put on the network, reported before solving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CapacityTotals {
    pub customer_reviews: i64,
    pub customer_capacity: i64,
    pub product_reviews: i64,
    pub product_capacity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub value: i64,
    pub reviews: Vec<Review>,
}

/// Bipartite network `s -> customers -> products -> t` together with the
/// review each customer -> product edge stands for.
#[derive(Debug, Clone)]
pub struct ReviewNetwork {
    pub graph: Graph<i64>,
    pub reviews: IndexMap<EdgeId, Review>,
    pub totals: CapacityTotals,
    pub num_customers: usize,
    pub num_products: usize,
}

impl ReviewNetwork {
    pub fn build(dataset: &ReviewDataset, config: &AssignmentConfig) -> Result<Self, AssignmentError> {
        let product_percentage = check_percentage(config.product_percentage)?;
        let customer_share = check_share(config.customer_share)?;
        let counts = dataset.product_counts();

        let mut graph: Graph<i64> = Graph::default();
        graph.add_vertex(SOURCE)?;
        graph.add_vertices(dataset.customers().map(|(customer, _)| customer))?;
        graph.add_vertices(counts.keys())?;
        graph.add_vertex(SINK)?;

        let mut totals = CapacityTotals::default();
        for (customer, products) in dataset.customers() {
            let capacity = (products.len() as f64 * customer_share) as i64;
            graph.add_edge(SOURCE, customer, capacity)?;
            totals.customer_reviews += products.len() as i64;
            totals.customer_capacity += capacity;
        }

        let mut reviews = IndexMap::new();
        for (customer, products) in dataset.customers() {
            for product in products {
                let edge_id = graph.add_edge(customer, product, 1)?;
                reviews.insert(edge_id, Review { customer: customer.to_owned(), product: product.clone() });
            }
        }

        for (product, &count) in counts.iter() {
            let capacity = (count as f64 * product_percentage / 100.0).ceil() as i64;
            graph.add_edge(product, SINK, capacity)?;
            totals.product_reviews += count as i64;
            totals.product_capacity += capacity;
        }

        info!("customers: {}, products: {}", dataset.num_customers(), counts.len());
        info!("customer reviews: {}, customer capacity: {}", totals.customer_reviews, totals.customer_capacity);
        info!("product reviews: {}, product capacity ({}%): {}", totals.product_reviews, product_percentage, totals.product_capacity);
        Ok(Self { graph, reviews, totals, num_customers: dataset.num_customers(), num_products: counts.len() })
    }

    pub fn solve(&mut self, solver: &mut PushRelabel) -> Result<Assignment, AssignmentError> {
        let value = solver.solve(&mut self.graph)?;
        let reviews = self.reviews.iter().filter(|(&edge_id, _)| self.graph.edge(edge_id).flow > 0).map(|(_, review)| review.clone()).collect();
        Ok(Assignment { value, reviews })
    }
}
