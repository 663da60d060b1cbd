// CLI command definitions

use super::stack::{ListCommand, PlanCommand, SynthCommand};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "asset-store-stack",
    version,
    about = "Declares a CDN-fronted asset store and synthesizes its deployment template",
    long_about = "Looks up the hosted zone, then declares a certificate, a public-read bucket, \
                  a distribution and an alias record. Without a subcommand the stack is \
                  synthesized into asset-store.out/"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Synthesize templates and the manifest into the output directory
    Synth(SynthCommand),

    /// Show what a deployment would create, update or delete
    Plan(PlanCommand),

    /// List the defined stacks
    List(ListCommand),
}
