//! Descriptor resolution command

use clap::Args;
use polystore_core::config::{resolve, resolve_strict};

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Properties file to load (key=value lines)
    #[arg(long)]
    pub config: Option<String>,

    /// Reject an unrecognized graph URI instead of falling back to embedded
    #[arg(long)]
    pub strict: bool,
}

pub fn execute(args: ResolveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let raw = super::load_config(args.config.as_deref())?;
    let descriptor = if args.strict {
        resolve_strict(&raw)?
    } else {
        resolve(&raw)?
    };

    println!("scheme:            {:?}", descriptor.scheme);
    println!(
        "uri:               {}",
        descriptor.uri.as_deref().unwrap_or("<none>")
    );
    println!(
        "credentials:       {}",
        if descriptor.credentials.is_some() {
            "set"
        } else {
            "unset"
        }
    );
    println!("encryption:        {}", descriptor.encryption.as_str());
    println!("verify_on_connect: {}", descriptor.verify_on_connect);
    println!("pool_size:         {}", descriptor.pool_size);
    println!("storage_dir:       {}", descriptor.storage_dir.display());
    println!("dump_dir:          {}", descriptor.dump_dir);
    println!("dump_filename:     {}", descriptor.dump_filename);
    println!("profile:           {:?}", descriptor.profile);
    Ok(())
}
