use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "weaver", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server.
    Serve(ServeArgs),
    /// Run one worker invocation and print the result.
    Invoke(InvokeArgs),
    /// List stored transcript chunks as JSON, newest first.
    Chunks(ChunksArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Reuse an existing session id instead of generating one.
    #[arg(long)]
    pub session_id: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct InvokeArgs {
    /// First input field. Empty is valid.
    #[arg(long, default_value = "")]
    pub field_a: String,

    /// Second input field. Empty is valid.
    #[arg(long, default_value = "")]
    pub field_b: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ChunksArgs {
    /// Override the chunk database path from config.
    #[arg(long)]
    pub store_path: Option<String>,
}
