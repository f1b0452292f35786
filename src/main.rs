use atlas::cli::{self, Args};
use clap::Parser;

#[tokio::main]
async fn main() -> atlas::Result<()> {
    let args = Args::parse();
    let workspace = cli::commands::workspace_root(args.workspace.as_deref())?;
    let _guard = atlas::logging::init(Some(workspace.as_path()), args.verbose)?;
    cli::run(args, &workspace).await
}
