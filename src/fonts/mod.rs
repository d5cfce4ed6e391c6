//! Font loading for certificate rendering.
//!
//! `genpdf` needs TrueType files for every style of the family.  The bundled Roboto family is
//! searched in this order:
//!
//! 1. the directory passed by the caller (`--fonts-dir`, [`crate::config::Config::fonts_dir`]),
//! 2. `EVENTIQ_FONTS_DIR`,
//! 3. `assets/fonts` next to the running executable,
//! 4. `assets/fonts` in this crate.
//!
//! When none of these hold the Roboto files, the loader falls back to system families: Liberation
//! Sans on Linux and Arial on Windows (`EVENTIQ_WINDOWS_FONTS_DIR`, `WINDIR` or `SystemRoot`).

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{self, FontData, FontFamily};
use log::{debug, warn};

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

/// Environment variable naming a directory with the bundled font files.
pub const FONTS_DIR_ENV: &str = "EVENTIQ_FONTS_DIR";

const WINDOWS_FONTS_DIR_ENV: &str = "EVENTIQ_WINDOWS_FONTS_DIR";

const FONT_FILES: &[&str] = &[
    "Roboto-Regular.ttf",
    "Roboto-Bold.ttf",
    "Roboto-Italic.ttf",
    "Roboto-BoldItalic.ttf",
];

struct FamilyFiles {
    name: &'static str,
    regular: &'static str,
    bold: &'static str,
    italic: &'static str,
    bold_italic: &'static str,
}

static LIBERATION_SANS: FamilyFiles = FamilyFiles {
    name: "Liberation Sans",
    regular: "LiberationSans-Regular.ttf",
    bold: "LiberationSans-Bold.ttf",
    italic: "LiberationSans-Italic.ttf",
    bold_italic: "LiberationSans-BoldItalic.ttf",
};

const LIBERATION_DIRECTORIES: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/liberation-sans",
    "/usr/share/fonts/liberation",
    "/usr/local/share/fonts/liberation",
];

static ARIAL: FamilyFiles = FamilyFiles {
    name: "Arial",
    regular: "arial.ttf",
    bold: "arialbd.ttf",
    italic: "ariali.ttf",
    bold_italic: "arialbi.ttf",
};

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().to_string_lossy().trim().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn push_unique(candidates: &mut Vec<PathBuf>, candidate: PathBuf) {
    if !candidates.iter().any(|existing| existing == &candidate) {
        candidates.push(candidate);
    }
}

/// Directories searched for the bundled family, in priority order.
pub fn font_directory_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = explicit {
        push_unique(&mut candidates, path.to_path_buf());
    }

    if let Some(path) = env_path(FONTS_DIR_ENV) {
        push_unique(&mut candidates, path);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            push_unique(&mut candidates, bin_dir.join("assets/fonts"));
        }
    }

    push_unique(&mut candidates, bundled_fonts_source_dir());

    candidates
}

/// The `assets/fonts` directory of this crate.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn missing_font_files(path: &Path) -> Vec<PathBuf> {
    FONT_FILES
        .iter()
        .map(|name| path.join(name))
        .filter(|candidate| !candidate.is_file())
        .collect()
}

fn resolve_font_directory(explicit: Option<&Path>) -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates(explicit) {
        let exists = candidate.is_dir();
        let missing = missing_font_files(&candidate);

        if exists && missing.is_empty() {
            return Ok(candidate);
        }

        let reason = if !exists {
            "directory missing".to_owned()
        } else {
            let missing_list = missing
                .iter()
                .map(|path| path.file_name().unwrap_or_default().to_string_lossy())
                .collect::<Vec<_>>()
                .join(", ");
            format!("missing files [{}]", missing_list)
        };

        attempts.push(format!("{} ({})", candidate.display(), reason));
    }

    Err(Error::new(
        format!(
            "Unable to locate the {} font directory. Checked: {}. See assets/fonts/README.md or set {}.",
            DEFAULT_FONT_FAMILY_NAME,
            attempts.join(", "),
            FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "bundled fonts directory not found"),
    ))
}

fn load_bundled_font_family(explicit: Option<&Path>) -> Result<FontFamily<FontData>, Error> {
    let directory = resolve_font_directory(explicit)?;
    debug!("Loading {} fonts from {}", DEFAULT_FONT_FAMILY_NAME, directory.display());

    fonts::from_files(&directory, DEFAULT_FONT_FAMILY_NAME, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{}' from {}: {}",
                DEFAULT_FONT_FAMILY_NAME,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

fn load_font_file(directory: &Path, file: &str, style: &str) -> Result<FontData, Error> {
    let path = directory.join(file);
    FontData::load(&path, None).map_err(|err| {
        let io_kind = if path.is_file() {
            io::ErrorKind::Other
        } else {
            io::ErrorKind::NotFound
        };
        Error::new(
            format!(
                "Failed to load fallback {} font at {}: {}",
                style,
                path.display(),
                err
            ),
            io::Error::new(io_kind, err.to_string()),
        )
    })
}

fn load_family(directory: &Path, files: &FamilyFiles) -> Result<FontFamily<FontData>, Error> {
    Ok(FontFamily {
        regular: load_font_file(directory, files.regular, "regular")?,
        bold: load_font_file(directory, files.bold, "bold")?,
        italic: load_font_file(directory, files.italic, "italic")?,
        bold_italic: load_font_file(directory, files.bold_italic, "bold italic")?,
    })
}

fn windows_font_directory() -> Option<PathBuf> {
    if let Some(path) = env_path(WINDOWS_FONTS_DIR_ENV) {
        return Some(path);
    }

    for var in ["WINDIR", "SystemRoot"] {
        if let Some(root) = env_path(var) {
            let candidate = root.join("Fonts");
            if candidate.is_dir() {
                return Some(candidate);
            }
        }
    }

    None
}

fn fallback_directories() -> Vec<(PathBuf, &'static FamilyFiles)> {
    let mut directories: Vec<(PathBuf, &'static FamilyFiles)> = LIBERATION_DIRECTORIES
        .iter()
        .map(PathBuf::from)
        .filter(|path| path.is_dir())
        .map(|path| (path, &LIBERATION_SANS))
        .collect();

    if let Some(path) = windows_font_directory() {
        directories.push((path, &ARIAL));
    }

    directories
}

fn system_fallback_font_family() -> Result<FontFamily<FontData>, Error> {
    let mut failures = Vec::new();

    for (directory, files) in fallback_directories() {
        match load_family(&directory, files) {
            Ok(family) => {
                debug!("Using {} fonts from {}", files.name, directory.display());
                return Ok(family);
            }
            Err(err) => failures.push(format!("{}: {}", files.name, err)),
        }
    }

    let detail = if failures.is_empty() {
        "no system font directories found".to_owned()
    } else {
        failures.join("; ")
    };

    Err(Error::new(
        format!("No system fallback fonts available ({})", detail),
        io::Error::new(io::ErrorKind::NotFound, "system fallback fonts not found"),
    ))
}

fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err)
            if io_err.kind() == io::ErrorKind::NotFound
                || io_err.kind() == io::ErrorKind::PermissionDenied
    )
}

/// Loads the bundled Roboto family, falling back to a system family when it is not installed.
pub fn load_font_family(explicit: Option<&Path>) -> Result<FontFamily<FontData>, Error> {
    match load_bundled_font_family(explicit) {
        Ok(family) => Ok(family),
        Err(err) if fonts_missing(&err) => match system_fallback_font_family() {
            Ok(fallback) => {
                warn!("Bundled fonts unavailable ({}); using a system fallback family.", err);
                Ok(fallback)
            }
            Err(fallback_err) => {
                warn!(
                    "Bundled fonts unavailable ({}); system fallback failed: {}",
                    err, fallback_err
                );
                Err(Error::new(
                    format!(
                        "Bundled fonts unavailable and system fallback failed: {}",
                        fallback_err
                    ),
                    io::Error::new(io::ErrorKind::NotFound, "certificate fonts are not available"),
                ))
            }
        },
        Err(err) => Err(err),
    }
}

/// Indicates whether [`load_font_family`] would find a usable family.
pub fn fonts_available(explicit: Option<&Path>) -> bool {
    resolve_font_directory(explicit).is_ok()
        || fallback_directories()
            .iter()
            .any(|(directory, files)| load_family(directory, files).is_ok())
}
