mod commands;
mod terminal;

use commands::{CommandLine, Commands, discover, evaluate, scan};
use exposr_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands: CommandLine = CommandLine::parse_args();

    logging::init_logging();

    let cfg: Config = Config {
        quiet: commands.quiet,
    };

    match commands.command {
        Commands::Discover(args) => {
            print::header("exposure discovery", cfg.quiet);
            discover::discover(&args.into(), &cfg).await
        }
        Commands::Scan(args) => {
            print::header("scan worker", cfg.quiet);
            scan::scan(&args.into(), &cfg).await
        }
        Commands::Evaluate(args) => {
            print::header("result evaluation", cfg.quiet);
            evaluate::evaluate(&args.into(), &cfg).await
        }
    }
}
