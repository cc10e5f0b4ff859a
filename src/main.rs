use std::io::{self, BufRead, Write};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ontograph::config::{self, Relation};
use ontograph::{LayoutParams, Session, WikidataClient, positioned_elements};

#[derive(Parser)]
#[command(
    name = "ontograph",
    about = "Explore the Wikidata ontology graph by expanding nodes relation by relation"
)]
struct Cli {
    /// Root topic (Mathematics, Physics, Biology, Computer Science, History, Chemistry)
    #[arg(default_value = "Mathematics")]
    topic: String,

    /// Relation property ids to expand along, in order
    #[arg(long, short = 'r', value_delimiter = ',', default_value = "P279")]
    relations: Vec<String>,

    /// Maximum children fetched per relation
    #[arg(long, short = 'l', default_value_t = 10)]
    limit: usize,

    /// Print positioned elements as JSON after every step
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let root_id = config::topic_id(&cli.topic).unwrap_or_else(|| {
        eprintln!("ERROR: unknown topic: {}", cli.topic);
        std::process::exit(1);
    });

    let relations: Vec<Relation> = cli
        .relations
        .iter()
        .map(|pid| {
            Relation::from_pid(pid).unwrap_or_else(|| {
                eprintln!("ERROR: unknown relation: {pid}");
                std::process::exit(1);
            })
        })
        .collect();
    let pids: Vec<&str> = relations.iter().map(|r| r.pid()).collect();

    let client = WikidataClient::new().unwrap_or_else(|e| {
        eprintln!("ERROR: failed to build HTTP client: {e}");
        std::process::exit(1);
    });

    let mut session = Session::new();
    session.init_root(root_id, &cli.topic);
    println!("Root node {} ({root_id}) initialized.", cli.topic);
    for relation in &relations {
        println!("  expanding along: {relation}");
    }
    println!("Commands: expand <id>, show, quit");

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("quit") | Some("exit"), _) => break,
            (Some("show"), _) => print_elements(&session),
            (Some("expand"), Some(id)) => {
                match session.expand(&client, id, &pids, cli.limit) {
                    Ok(summary) => print!("{summary}"),
                    Err(e) => eprintln!("ERROR: {e}"),
                }
                if cli.json {
                    print_elements(&session);
                }
            }
            (Some("expand"), None) => eprintln!("ERROR: expand needs a node id"),
            (None, _) => {}
            (Some(other), _) => eprintln!("ERROR: unknown command: {other}"),
        }
    }
}

fn print_elements(session: &Session) {
    let elements = positioned_elements(session.store(), &LayoutParams::default());
    match serde_json::to_string_pretty(&elements) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("ERROR: failed to serialize elements: {e}"),
    }
}
