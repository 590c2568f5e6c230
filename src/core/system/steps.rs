//! Provisioning steps that wrap external tools and plain file copying.
//!
//! None of these keep state between runs; each is safe to repeat.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::CommandRunner;
use crate::core::constants::{EXEC_MODE, INTERPRETER_MARKER, SCRIPT_EXTENSION};
use crate::error::{Result, StoreError};

/// Install OS packages with the system package manager.
pub fn install_packages(runner: &impl CommandRunner, packages: &[String]) -> Result<()> {
    if packages.is_empty() {
        debug!("no packages configured");
        return Ok(());
    }

    runner.require("apt-get")?;
    runner.run("apt-get", &["update", "-q"])?;

    let mut args = vec!["install", "-y", "-q", "--no-install-recommends"];
    args.extend(packages.iter().map(String::as_str));
    runner.run("apt-get", &args)?;

    info!(count = packages.len(), "packages installed");
    Ok(())
}

/// Shallow-clone `reference` of `repository` into `dest`.
pub fn fetch_sources(
    runner: &impl CommandRunner,
    repository: &str,
    reference: &str,
    dest: &Path,
) -> Result<()> {
    runner.require("git")?;

    let dest = dest.to_string_lossy().into_owned();
    runner.run(
        "git",
        &[
            "clone",
            "--quiet",
            "--depth",
            "1",
            "--branch",
            reference,
            repository,
            dest.as_str(),
        ],
    )?;

    info!(repository, reference, "sources fetched");
    Ok(())
}

/// Install Python dependencies when the tree ships a manifest.
///
/// Returns `false` without running anything if the manifest is absent.
pub fn install_dependencies(
    runner: &impl CommandRunner,
    tree: &Path,
    manifest: &str,
) -> Result<bool> {
    let path = tree.join(manifest);
    if !path.is_file() {
        debug!(manifest = %path.display(), "no dependency manifest, skipping");
        return Ok(false);
    }

    let path = path.to_string_lossy().into_owned();
    runner.run(
        "python3",
        &["-m", "pip", "install", "--quiet", "-r", path.as_str()],
    )?;

    info!("dependencies installed");
    Ok(true)
}

/// Create the state directory, the log directory and each log file.
///
/// Existing files are left as they are.
pub fn prepare_filesystem(state_dir: &Path, log_dir: &Path, log_files: &[String]) -> Result<()> {
    for dir in [state_dir, log_dir] {
        fs::create_dir_all(dir).map_err(|source| StoreError::Create {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    for name in log_files {
        let path = log_dir.join(name);
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| StoreError::Create { path, source })?;
    }

    debug!(state = %state_dir.display(), logs = %log_dir.display(), "filesystem prepared");
    Ok(())
}

/// Ensure the script starts with an interpreter line.
pub fn with_interpreter(contents: &[u8]) -> Vec<u8> {
    if contents.starts_with(b"#!") {
        return contents.to_vec();
    }

    let mut out = Vec::with_capacity(INTERPRETER_MARKER.len() + 1 + contents.len());
    out.extend_from_slice(INTERPRETER_MARKER.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(contents);
    out
}

fn is_script(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SCRIPT_EXTENSION)
}

/// Copy every `.py` file directly under `scripts` into `bin_dir` as an
/// executable.
///
/// Hidden files, subdirectories and other files are skipped. A missing
/// `scripts` directory deploys nothing. Each script is written next to its
/// destination and renamed into place.
pub fn deploy_scripts(scripts: &Path, bin_dir: &Path) -> Result<Vec<PathBuf>> {
    if !scripts.is_dir() {
        warn!(dir = %scripts.display(), "no scripts directory, nothing deployed");
        return Ok(Vec::new());
    }

    fs::create_dir_all(bin_dir).map_err(|source| StoreError::Create {
        path: bin_dir.to_path_buf(),
        source,
    })?;

    let read_dir = fs::read_dir(scripts).map_err(|source| StoreError::Read {
        path: scripts.to_path_buf(),
        source,
    })?;

    let mut sources = Vec::new();
    for entry in read_dir {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') || !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if is_script(&path) {
            sources.push(path);
        } else {
            debug!(file = %path.display(), "not a script, skipped");
        }
    }
    sources.sort();

    let mut deployed = Vec::with_capacity(sources.len());
    for source in sources {
        let Some(name) = source.file_name() else {
            continue;
        };
        let dest = bin_dir.join(name);
        install_executable(&source, &dest)?;
        debug!(script = %dest.display(), "deployed");
        deployed.push(dest);
    }

    if deployed.is_empty() {
        warn!(dir = %scripts.display(), "no scripts found, nothing deployed");
    } else {
        info!(count = deployed.len(), dir = %bin_dir.display(), "scripts deployed");
    }
    Ok(deployed)
}

fn install_executable(source: &Path, dest: &Path) -> Result<()> {
    let contents = fs::read(source).map_err(|e| StoreError::Read {
        path: source.to_path_buf(),
        source: e,
    })?;

    let dir = dest.parent().unwrap_or(Path::new("."));
    let stage = || -> std::io::Result<tempfile::NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix(".mgsetup.")
            .tempfile_in(dir)?;
        file.write_all(&with_interpreter(&contents))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.as_file()
                .set_permissions(fs::Permissions::from_mode(EXEC_MODE))?;
        }
        Ok(file)
    };

    let staged = stage().map_err(|e| StoreError::Stage {
        path: dest.to_path_buf(),
        source: e,
    })?;
    staged.persist(dest).map_err(|e| StoreError::Commit {
        path: dest.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
