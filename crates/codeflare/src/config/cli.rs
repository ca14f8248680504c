use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use utils::version;

#[derive(Parser)]
#[command(about, long_about, version = &**version::VERSION)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a RayCluster (or AppWrapper) manifest from a cluster configuration
    Generate(GenerateArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    #[arg(
        long,
        short,
        value_hint = clap::ValueHint::FilePath,
        help = "Path to the cluster configuration YAML file"
    )]
    pub config: PathBuf,

    #[arg(
        long,
        env = "KUBECONFIG",
        value_hint = clap::ValueHint::FilePath,
        help = "Path to a kubeconfig file (defaults to in-cluster or ~/.kube/config)"
    )]
    pub kubeconfig: Option<PathBuf>,

    #[arg(
        long,
        value_hint = clap::ValueHint::DirPath,
        help = "Directory for written manifests, defaults to ~/.codeflare/resources"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        long,
        help = "Write the manifest to the resource directory even if the configuration does not ask for it"
    )]
    pub write_to_file: bool,
}
