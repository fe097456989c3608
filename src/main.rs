use anyhow::{Context, Result};
use script::Session;
use std::{env, fs::File, io::Read, process};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod chain;
mod script;

/*
 * Scenario run when no script is given : build two chains, swap them,
 * swap two nodes and sort, checking the contents along the way.
 */
const DEMO: &str = "
one new 30
one append 20
one append 0
one append 40
one prepend 10
one prepend 60
one prepend 70
one prepend 50
one print

two new 25
two append 22
two append 4
two append 47
two prepend 11
two prepend 62
two prepend 65
two print

one swap two
one expect 65 62 11 25 22 4 47
two expect 50 70 60 10 30 20 0 40

two swap_node 70 0
two expect 50 0 60 10 30 20 70 40

two sort
two expect 0 10 20 30 40 50 60 70
two expect_size 8
one print
two print
";

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ordered_chain=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("Singly-linked integer chain with in-place merge sort");
    let input = match env::args().len() {
        1 => DEMO.to_string(),
        2 => {
            let mut args = env::args().skip(1);
            let path = args.next().unwrap_or_default();
            let mut f = File::open(&path).with_context(|| format!("Failed to open {}", path))?;
            let mut input = String::new();
            f.read_to_string(&mut input)
                .context("Failed to read file")?;
            input
        }
        _ => {
            println!(
                "Usage : {} [script file]",
                env::args().next().unwrap_or_default()
            );
            process::exit(1);
        }
    };

    let commands = script::parse(&input).context("Failed to parse script")?;
    let mut session = Session::default();
    session.run(&commands).context("Script failed")?;

    Ok(())
}
