use push_relabel_assignment::assignment::dataset::ReviewDataset;
use push_relabel_assignment::assignment::{parse_percentage, prepare, AssignmentConfig, AssignmentError};
use push_relabel_assignment::maximum_flow::push_relabel::PushRelabel;
use std::env;
use std::process::ExitCode;
use std::time::Instant;

// usage: assignment <metadata file> [customer %] [product %]
fn run(args: &[String]) -> Result<(), AssignmentError> {
    let mut config = AssignmentConfig::default();
    if let Some(percentage) = args.get(2) {
        config.customer_percentage = parse_percentage(percentage)?;
    }
    if let Some(percentage) = args.get(3) {
        config.product_percentage = parse_percentage(percentage)?;
    }

    let dataset = ReviewDataset::from_path(&args[1])?;
    eprintln!("#customers:{}", dataset.num_customers());

    let mut network = prepare(dataset, &config)?;
    eprintln!("#customers kept:{} #products:{}", network.num_customers, network.num_products);
    eprintln!("#vertices:{} #edges:{}", network.graph.num_vertices(), network.graph.num_edges());
    eprintln!("{:?}", network.totals);

    let mut solver = PushRelabel::default();
    let start = Instant::now();
    let assignment = network.solve(&mut solver)?;
    let end = start.elapsed();
    eprintln!("{}.{:03}", end.as_secs(), end.subsec_millis());
    eprintln!("maximum flow:{} pushes:{} relabels:{}", assignment.value, solver.push_count(), solver.relabel_count());

    match serde_json::to_string_pretty(&assignment) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("{}", e),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: {} <metadata file> [customer %] [product %]", args[0]);
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
