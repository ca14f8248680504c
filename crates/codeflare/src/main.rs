use anyhow::anyhow;
use anyhow::Result;
use clap::Parser;
use codeflare::config::Cli;
use codeflare::config::ClusterConfig;
use codeflare::config::ClusterConfigSpec;
use codeflare::config::Commands;
use codeflare::config::GenerateArgs;
use codeflare::k8s::KubeLocalQueueRegistry;
use codeflare::ClusterManifestBuilder;
use codeflare::ManifestOutput;
use codeflare::ResourceWriter;
use tracing::level_filters::LevelFilter;
use utils::logging;
use utils::version;

/// Sets up global panic hooks.
fn setup_global_hooks() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        default_hook(panic_info);
        tracing::error!("Thread panicked: {}", panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_global_hooks();

    let cli = Cli::parse();
    logging::init(match cli.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    });

    match cli.command {
        Commands::Generate(generate_args) => run_generate(generate_args).await,
    }
}

async fn run_generate(args: GenerateArgs) -> Result<()> {
    tracing::debug!("codeflare {}", &**version::VERSION);

    let mut spec = ClusterConfigSpec::from_yaml_file(&args.config)
        .map_err(|e| anyhow!("Failed to load cluster configuration: {e:?}"))?;
    spec.write_to_file |= args.write_to_file;
    let config =
        ClusterConfig::new(spec).map_err(|e| anyhow!("Invalid cluster configuration: {e:?}"))?;

    let writer = match args.output_dir {
        Some(dir) => ResourceWriter::new(dir),
        None => ResourceWriter::in_home()
            .map_err(|e| anyhow!("Failed to locate resource directory: {e:?}"))?,
    };
    let registry = KubeLocalQueueRegistry::connect(args.kubeconfig.as_deref())
        .await
        .map_err(|e| anyhow!("Failed to connect to Kubernetes: {e:?}"))?;

    let output = ClusterManifestBuilder::new(registry, writer)
        .build(&config)
        .await
        .map_err(|e| anyhow!("Failed to generate manifest: {e:?}"))?;

    match output {
        ManifestOutput::Written(path) => println!("{}", path.display()),
        ManifestOutput::Loaded(document) => print!("{}", serde_yaml::to_string(&document)?),
    }
    Ok(())
}
