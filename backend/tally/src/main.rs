use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the running dispatch server
    #[arg(long, env = "DISPATCH_SERVER", default_value = "http://localhost:5000")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rescan the sheet and print the next numbers
    Show,

    /// Force the next number of a file type to follow TOTAL
    Set { file_type: String, total: u64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let numbers = match args.command {
        Command::Show => tally::fetch_numbers(&args.server).await?,
        Command::Set { file_type, total } => {
            tally::set_number(&args.server, &file_type, total).await?
        }
    };

    println!("Next Letter: {}", numbers.letters);
    println!("Next Other: {}", numbers.others);

    Ok(())
}
