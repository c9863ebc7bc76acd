use clap::Parser;
use teller::{server, Error};

const PORT: u16 = 7878;

#[derive(Parser, Debug)]
struct Args {
    /// The port to listen on
    #[arg(short, long, default_value_t = PORT)]
    port: u16,

    /// The SQLite database holding the account and customer tables
    #[arg(
        short,
        long,
        env = "TELLER_DATABASE_URL",
        default_value = "sqlite://teller.db?mode=rwc"
    )]
    database_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    server::run(args.port, &args.database_url).await
}
