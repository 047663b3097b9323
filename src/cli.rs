use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct ServoObserverArgs {
    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(long, short, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: CommandsEnum,
}

#[derive(Debug, Subcommand)]
pub enum CommandsEnum {
    /// Design the controller, run the simulation and render the charts
    Simulate(SimulateArgs),
    /// Print the feedback, feedforward and observer design
    Design(ParameterFilePath),
    /// Print the default parameter file
    DefaultParams,
}

#[derive(Debug, Args)]
pub struct ParameterFilePath {
    /// JSON parameter file, defaults are used when omitted
    pub params_path: Option<String>,
}

#[derive(Debug, Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub params: ParameterFilePath,

    /// Directory for the SVG charts
    #[clap(long, short, default_value = "out")]
    pub out_dir: String,

    /// Skip rendering
    #[clap(long)]
    pub no_plots: bool,
}
