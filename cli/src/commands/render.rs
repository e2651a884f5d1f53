//! `taskspec render` — render a command configuration into a task spec.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use taskspec_common::CommandConfig;

use crate::domain::{Archive, CommandSpec, TaskSpec};
use crate::infra::fs::{archive_from_dir, load_key_pair, load_yaml};
use crate::infra::tarball::{archive_digest, fragment_file_name, write_tar_gz};

/// Arguments for the render command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Command configuration (YAML or JSON)
    #[arg(long, short = 'c')]
    pub config: PathBuf,

    /// Base task template (YAML or JSON); built-in defaults when omitted
    #[arg(long, env = "TASKSPEC_TEMPLATE")]
    pub template: Option<PathBuf>,

    /// Directory shipped to the task's working directory
    #[arg(long)]
    pub user_files: Option<PathBuf>,

    /// Directory of platform files, extracted at the container root
    #[arg(long)]
    pub additional_files: Option<PathBuf>,

    /// Existing private key to install for SSH access
    #[arg(long, requires = "public_key")]
    pub private_key: Option<PathBuf>,

    /// Public half of --private-key
    #[arg(long, requires = "private_key")]
    pub public_key: Option<PathBuf>,

    /// Token the task uses to authenticate to the master
    #[arg(long, env = "TASKSPEC_TASK_TOKEN", default_value = "", hide_env_values = true)]
    pub token: String,

    /// Also write every archive fragment as a tar.gz into this directory
    #[arg(long)]
    pub archives_dir: Option<PathBuf>,

    /// Print only the archive digest
    #[arg(long)]
    pub digest: bool,
}

/// Run the render command.
///
/// # Errors
///
/// Returns an error if an input cannot be loaded, rendering fails, or the
/// output cannot be written.
pub fn run(args: &RenderArgs) -> Result<()> {
    let spec = load_command_spec(args)?;
    let keys = match (&args.private_key, &args.public_key) {
        (Some(private), Some(public)) => Some(load_key_pair(private, public)?),
        _ => None,
    };

    let task = spec
        .to_task_spec(keys.as_ref(), &args.token)
        .context("rendering task spec")?;

    if let Some(dir) = &args.archives_dir {
        write_fragments(dir, &task)?;
    }

    if args.digest {
        println!("{}", archive_digest(&task.archives)?);
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(&task).context("serializing task spec")?
        );
    }
    Ok(())
}

/// Assemble a [`CommandSpec`] from the files named in `args`.
///
/// # Errors
///
/// Returns an error if any file or directory cannot be read or parsed.
pub fn load_command_spec(args: &RenderArgs) -> Result<CommandSpec> {
    let config: CommandConfig = load_yaml(&args.config)?;
    let base: TaskSpec = match &args.template {
        Some(path) => load_yaml(path)?,
        None => TaskSpec::default(),
    };
    Ok(CommandSpec {
        base,
        config,
        user_files: optional_dir(args.user_files.as_deref())?,
        additional_files: optional_dir(args.additional_files.as_deref())?,
        metadata: std::collections::BTreeMap::new(),
    })
}

fn optional_dir(dir: Option<&Path>) -> Result<Archive> {
    dir.map_or_else(|| Ok(Archive::new()), archive_from_dir)
}

fn write_fragments(dir: &Path, task: &TaskSpec) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    for (index, run) in task.archives.iter().enumerate() {
        let path = dir.join(fragment_file_name(index, run));
        let file = std::fs::File::create(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        write_tar_gz(run, file).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), entries = run.archive.len(), "wrote fragment");
    }
    Ok(())
}
