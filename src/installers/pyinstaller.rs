//! # Onefile builder
//!
//! Produces a single-file scraper executable on macOS and Linux, where no
//! trustworthy prebuilt one exists. The steps, all inside `<work>`:
//!
//! 1. Find a Python interpreter (`python3`, then `python`).
//! 2. Create or reuse the isolated environment at `<work>/venv` and install
//!    the scraper and PyInstaller into it.
//! 3. Resolve the scraper's entry module.
//! 4. Write the bundled hook files to `<work>/hooks`.
//! 5. Run PyInstaller in onefile mode.
//! 6. Install the artifact into `binaries/`, then remove the build leftovers.
//!
//! The venv survives the run so a later rebuild does not reinstall everything.
//! When a step fails its captured output is left in `<work>/<step>.log`.

use crate::errors::{BootstrapError, Result};
use crate::installers::fetcher::place_sidecar;
use crate::libs::context::BootstrapContext;
use crate::libs::utilities::binary::find_on_search_path;
use crate::libs::utilities::platform::OsFamily;
use crate::schemas::sidecar::{InstalledBinary, SidecarSpec};
use crate::{log_debug, log_error, log_info, log_warn};
use colored::Colorize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

const HOOK_FILE: &str = "hook-gallery_dl.py";
const RUNTIME_HOOK_FILE: &str = "rthook-gallery-dl.py";
const HOOK_SOURCE: &str = include_str!("../../pyinstaller-hooks/hook-gallery_dl.py");
const RUNTIME_HOOK_SOURCE: &str = include_str!("../../pyinstaller-hooks/rthook-gallery-dl.py");

/// Packages installed into the build environment.
const BUILD_PACKAGES: [&str; 2] = ["gallery-dl", "pyinstaller"];

/// Sub-packages the scraper loads by name at runtime.
const COLLECTED_SUBMODULES: [&str; 4] = [
    "gallery_dl.extractor",
    "gallery_dl.downloader",
    "gallery_dl.postprocessor",
    "gallery_dl.output",
];

/// Lines of a failing step's stderr carried into the error message.
const STDERR_TAIL_LINES: usize = 20;

/// Builds `spec` as a onefile executable and installs it.
pub fn ensure_onefile(ctx: &BootstrapContext, spec: &SidecarSpec) -> Result<InstalledBinary> {
    let name = spec.filename(&ctx.profile);
    let name = name
        .strip_suffix(ctx.profile.os_family.exe_suffix())
        .unwrap_or(&name)
        .to_string();
    log_info!("[PyInstaller] Building {} from source", name.bold());

    fs::create_dir_all(&ctx.work_dir)?;
    let interpreter = find_interpreter()?;
    let python = prepare_environment(ctx, &interpreter)?;
    let entry = resolve_entry_module(ctx, &python)?;
    let runtime_hook = write_hooks(&ctx.hooks_dir())?;

    let args = pyinstaller_args(&name, &ctx.work_dir, &ctx.hooks_dir(), &runtime_hook, &entry);
    let mut build = ctx.command(&python, &ctx.work_dir);
    build.args(["-m", "PyInstaller"]).args(&args);
    run_step(ctx, build, "pyinstaller")?;

    let artifact = ctx
        .work_dir
        .join("dist")
        .join(format!("{name}{}", ctx.profile.os_family.exe_suffix()));
    if !artifact.is_file() {
        return Err(BootstrapError::Build(format!(
            "PyInstaller finished but {} was not produced",
            artifact.display()
        )));
    }

    let installed = place_sidecar(ctx, spec, &artifact)?;
    cleanup_intermediates(&ctx.work_dir, &name);
    Ok(installed)
}

/// `python3`, else `python`, from the extended search path.
pub fn find_interpreter() -> Result<PathBuf> {
    for candidate in ["python3", "python"] {
        if let Some(path) = find_on_search_path(candidate) {
            log_debug!("[PyInstaller] Using interpreter {}", path.display());
            return Ok(path);
        }
    }
    Err(BootstrapError::missing(
        "Python 3",
        "The scraper is built from source on this platform. \
         Install Python 3 from https://www.python.org/downloads/ and re-run the bootstrap.",
    ))
}

/// Interpreter inside a venv created at `venv`.
pub fn venv_python(venv: &Path, os: OsFamily) -> PathBuf {
    match os {
        OsFamily::Windows => venv.join("Scripts").join("python.exe"),
        OsFamily::MacOs | OsFamily::Linux => venv.join("bin").join("python"),
    }
}

/// Returns the venv interpreter, creating and populating the venv when the
/// existing one is missing or cannot import the build packages.
fn prepare_environment(ctx: &BootstrapContext, interpreter: &Path) -> Result<PathBuf> {
    let venv = ctx.venv_dir();
    let python = venv_python(&venv, ctx.profile.os_family);

    if python.exists() && venv_is_healthy(ctx, &python) {
        log_info!(
            "[PyInstaller] Reusing build environment at {}",
            venv.display().to_string().cyan()
        );
        return Ok(python);
    }

    if venv.exists() {
        log_warn!(
            "[PyInstaller] Build environment at {} is unusable, recreating it",
            venv.display()
        );
    } else {
        log_info!("[PyInstaller] Creating build environment at {}", venv.display());
    }

    let mut create = ctx.command(interpreter, &ctx.work_dir);
    create.args(["-m", "venv", "--clear"]).arg(&venv);
    run_step(ctx, create, "venv")?;

    log_info!(
        "[PyInstaller] Installing {} into the build environment",
        BUILD_PACKAGES.join(", ").cyan()
    );
    let mut install = ctx.command(&python, &ctx.work_dir);
    install
        .args(["-m", "pip", "install", "--upgrade"])
        .args(BUILD_PACKAGES)
        .env("PIP_DISABLE_PIP_VERSION_CHECK", "1");
    run_step(ctx, install, "pip-install")?;

    Ok(python)
}

fn venv_is_healthy(ctx: &BootstrapContext, python: &Path) -> bool {
    ctx.command(python, &ctx.work_dir)
        .args(["-c", "import gallery_dl, PyInstaller"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// File path of the scraper's `__main__` module inside the venv.
fn resolve_entry_module(ctx: &BootstrapContext, python: &Path) -> Result<PathBuf> {
    let output = ctx
        .command(python, &ctx.work_dir)
        .args(["-c", "import gallery_dl.__main__ as m; print(m.__file__)"])
        .output()?;

    if !output.status.success() {
        return Err(BootstrapError::Build(format!(
            "could not locate the gallery_dl entry module: {}",
            tail_lines(&String::from_utf8_lossy(&output.stderr), STDERR_TAIL_LINES)
        )));
    }

    let entry = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
    log_debug!("[PyInstaller] Entry module: {}", entry.display());
    Ok(entry)
}

/// Writes both hook files into `dir` and returns the runtime hook's path.
pub fn write_hooks(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(HOOK_FILE), HOOK_SOURCE)?;
    let runtime_hook = dir.join(RUNTIME_HOOK_FILE);
    fs::write(&runtime_hook, RUNTIME_HOOK_SOURCE)?;
    Ok(runtime_hook)
}

/// Arguments passed to `python -m PyInstaller`.
pub fn pyinstaller_args(
    name: &str,
    work: &Path,
    hooks: &Path,
    runtime_hook: &Path,
    entry: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["--onefile", "--noconfirm", "--clean", "--name", name]
        .into_iter()
        .map(OsString::from)
        .collect();

    let mut flag = |key: &str, value: &Path| {
        args.push(key.into());
        args.push(value.as_os_str().to_owned());
    };
    flag("--distpath", &work.join("dist"));
    flag("--workpath", &work.join("build"));
    flag("--specpath", work);
    flag("--additional-hooks-dir", hooks);
    flag("--runtime-hook", runtime_hook);

    for module in COLLECTED_SUBMODULES {
        args.push("--collect-submodules".into());
        args.push(module.into());
    }
    args.push("--collect-data".into());
    args.push("gallery_dl".into());

    args.push(entry.as_os_str().to_owned());
    args
}

/// Runs one build step, keeping its output in `<work>/<step>.log` on failure.
fn run_step(ctx: &BootstrapContext, mut cmd: Command, step: &str) -> Result<()> {
    log_debug!("[PyInstaller] Running {:?}", cmd);
    let output = cmd.stdin(Stdio::null()).output()?;
    if output.status.success() {
        return Ok(());
    }

    let log_path = ctx.work_dir.join(format!("{step}.log"));
    let mut log = output.stdout.clone();
    log.extend_from_slice(&output.stderr);
    if let Err(e) = fs::write(&log_path, &log) {
        log_debug!("[PyInstaller] Could not write {}: {}", log_path.display(), e);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    log_error!(
        "[PyInstaller] Step '{}' failed, full output in {}",
        step.red(),
        log_path.display()
    );
    Err(BootstrapError::Build(format!(
        "{step} failed ({}):\n{}",
        output.status,
        tail_lines(&stderr, STDERR_TAIL_LINES)
    )))
}

/// Removes PyInstaller's `build/`, `dist/` and spec file. The venv stays.
pub fn cleanup_intermediates(work: &Path, name: &str) {
    for dir in [work.join("build"), work.join("dist")] {
        if dir.exists() {
            if let Err(e) = fs::remove_dir_all(&dir) {
                log_debug!("[PyInstaller] Could not remove {}: {}", dir.display(), e);
            }
        }
    }
    let spec_file = work.join(format!("{name}.spec"));
    if spec_file.exists() {
        if let Err(e) = fs::remove_file(&spec_file) {
            log_debug!("[PyInstaller] Could not remove {}: {}", spec_file.display(), e);
        }
    }
}

/// The last `n` non-empty lines of `text`.
pub fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    lines[lines.len().saturating_sub(n)..].join("\n")
}
