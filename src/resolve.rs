//! Argument resolution
//!
//! Turns parsed CLI input into the concrete values the pipeline needs:
//! - zero-padded year and month (defaulting to the clock's date)
//! - initials (explicit or taken from the title's uppercase letters)
//! - the full, sorted list of source directories including every nested
//!   subdirectory

use crate::cli::Cli;
use crate::clock::Clock;
use crate::config::Config;
use crate::error::{Error, Result};
use chrono::Datelike;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Fully resolved arguments for one curation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arguments {
    /// Directory that receives the album folder
    pub destination: PathBuf,
    /// Every directory to scan, deduplicated and sorted by path
    pub sources: Vec<PathBuf>,
    /// Filename prefix
    pub initials: String,
    pub title: String,
    /// Four-digit year
    pub year: String,
    /// Two-digit month
    pub month: String,
}

impl Arguments {
    /// Resolve CLI input against the config file defaults and the clock
    pub fn resolve(cli: &Cli, config: &Config, clock: &dyn Clock) -> Result<Self> {
        let today = clock.today();
        let year = cli.year.map(u32::from).unwrap_or(today.year().max(0) as u32);
        let month = cli.month.map(u32::from).unwrap_or(today.month());

        let merged = cli.merge_with_config(config.clone());
        let title = merged.title;
        let initials = merged
            .initials
            .unwrap_or_else(|| derive_initials(&title));

        let sources = resolve_sources(&cli.sources)?;

        info!(
            sources = sources.len(),
            %title,
            %initials,
            year,
            month,
            "Resolved arguments"
        );

        Ok(Self {
            destination: normalize_path(&cli.destination),
            sources,
            initials,
            title,
            year: pad_year(year),
            month: pad_month(month),
        })
    }
}

/// Uppercase characters of the title, in order
pub fn derive_initials(title: &str) -> String {
    title.chars().filter(|c| c.is_uppercase()).collect()
}

/// Left-pad a year to four digits
pub fn pad_year(year: u32) -> String {
    format!("{:04}", year)
}

/// Left-pad a month to two digits
pub fn pad_month(month: u32) -> String {
    format!("{:02}", month)
}

/// Drop `.` components so `./photos` and `photos` compare equal
pub fn normalize_path(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// First source that contains the destination, if any
///
/// Paths are compared in absolute form, so a relative destination is
/// still caught inside an absolute or `.` source.
pub fn destination_inside_source(args: &Arguments) -> Option<&PathBuf> {
    let absolute = |path: &Path| {
        std::path::absolute(path)
            .map(|p| normalize_path(&p))
            .unwrap_or_else(|_| normalize_path(path))
    };
    let destination = absolute(&args.destination);

    args.sources
        .iter()
        .find(|source| destination.starts_with(absolute(source)))
}

/// Expand the supplied sources with every subdirectory beneath them
///
/// Each supplied source must be an existing directory. The result is
/// deduplicated and ordered by path.
pub fn resolve_sources(roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut sources = BTreeSet::new();

    for root in roots {
        if !root.exists() {
            return Err(Error::SourceMissing { path: root.clone() });
        }
        if !root.is_dir() {
            return Err(Error::SourceNotDirectory { path: root.clone() });
        }

        sources.insert(normalize_path(root));
        sources.extend(collect_subsources(root)?);
    }

    Ok(sources.into_iter().collect())
}

/// Every directory reachable below `root`, at any depth
pub fn collect_subsources(root: &Path) -> Result<BTreeSet<PathBuf>> {
    let mut subsources = BTreeSet::new();

    for entry in WalkDir::new(root).min_depth(1).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.loop_ancestor().is_some() => {
                warn!(path = ?e.path(), "Skipping directory symlink loop");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if entry.file_type().is_dir() {
            debug!(path = ?entry.path(), "Found subsource");
            subsources.insert(normalize_path(entry.path()));
        }
    }

    Ok(subsources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;
    use clap::Parser;
    use std::ffi::OsString;
    use std::fs;
    use tempfile::{Builder, tempdir};

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2021, 3, 9).unwrap())
    }

    fn parse(dest: &Path, src: &Path, extra: &[&str]) -> Cli {
        let mut argv: Vec<OsString> = vec!["album-curator".into(), dest.into(), src.into()];
        argv.extend(extra.iter().map(|s| OsString::from(*s)));
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_derive_initials() {
        assert_eq!(derive_initials("Album"), "A");
        assert_eq!(derive_initials("Grand Canyon Trip"), "GCT");
        assert_eq!(derive_initials("McDonald Family"), "MDF");
        assert_eq!(derive_initials("lowercase only"), "");
        assert_eq!(derive_initials(""), "");
    }

    #[test]
    fn test_padding() {
        assert_eq!(pad_year(2024), "2024");
        assert_eq!(pad_year(999), "0999");
        assert_eq!(pad_year(7), "0007");
        assert_eq!(pad_month(3), "03");
        assert_eq!(pad_month(12), "12");
    }

    #[test]
    fn test_collect_nested_subsources() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("root");
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::create_dir_all(root.join("d")).unwrap();
        fs::write(root.join("a/photo.jpg"), b"x").unwrap();

        let subsources = collect_subsources(&root).unwrap();
        let expected: BTreeSet<PathBuf> = [
            root.join("a"),
            root.join("a/b"),
            root.join("a/b/c"),
            root.join("d"),
        ]
        .into_iter()
        .collect();
        assert_eq!(subsources, expected);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_skipped() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("root");
        fs::create_dir_all(root.join("a")).unwrap();
        std::os::unix::fs::symlink(&root, root.join("a/back")).unwrap();

        let subsources = collect_subsources(&root).unwrap();
        assert_eq!(subsources, BTreeSet::from([root.join("a")]));
    }

    #[test]
    fn test_resolve_sources_dedup_and_sort() {
        let dir = tempdir().unwrap();
        let one = dir.path().join("one");
        let two = dir.path().join("two");
        fs::create_dir_all(one.join("inner")).unwrap();
        fs::create_dir_all(&two).unwrap();

        // Overlapping roots: "one/inner" is both supplied and discovered
        let sources =
            resolve_sources(&[two.clone(), one.join("inner"), one.clone(), two.clone()]).unwrap();
        assert_eq!(sources, vec![one.clone(), one.join("inner"), two]);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("./photos")), PathBuf::from("photos"));
        assert_eq!(normalize_path(Path::new("a/./b/")), PathBuf::from("a/b"));
        assert_eq!(normalize_path(Path::new(".")), PathBuf::from("."));
        assert_eq!(normalize_path(Path::new("./")), PathBuf::from("."));
        assert_eq!(normalize_path(Path::new("/x/./y")), PathBuf::from("/x/y"));
    }

    #[test]
    fn test_resolve_sources_relative_spellings() {
        // Relative to the test's working directory
        let dir = Builder::new().prefix("resolve-").tempdir_in(".").unwrap();
        let name = PathBuf::from(dir.path().file_name().unwrap());
        fs::create_dir_all(name.join("photos")).unwrap();

        let dotted = Path::new(".").join(&name);
        let sources = resolve_sources(&[
            dotted.clone(),
            name.join("photos"),
            dotted.join("photos"),
            name.clone(),
        ])
        .unwrap();
        assert_eq!(sources, vec![name.clone(), name.join("photos")]);

        let cli = parse(&dotted.join("out"), &dotted, &[]);
        let args = Arguments::resolve(&cli, &Config::default(), &clock()).unwrap();
        assert_eq!(args.destination, name.join("out"));
        assert_eq!(args.sources, vec![name.clone(), name.join("photos")]);
    }

    #[test]
    fn test_destination_inside_source() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();

        let mut args = Arguments {
            destination: PathBuf::from("out"),
            sources: vec![PathBuf::from(".")],
            initials: "A".into(),
            title: "Album".into(),
            year: "2021".into(),
            month: "03".into(),
        };
        assert_eq!(destination_inside_source(&args), Some(&PathBuf::from(".")));

        args.destination = PathBuf::from("./out");
        assert_eq!(destination_inside_source(&args), Some(&PathBuf::from(".")));

        args.sources = vec![src.clone()];
        args.destination = src.join("album");
        assert_eq!(destination_inside_source(&args), Some(&src));

        args.destination = dir.path().join("elsewhere");
        assert_eq!(destination_inside_source(&args), None);
    }

    #[test]
    fn test_resolve_sources_errors() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.jpg");
        fs::write(&file, b"x").unwrap();

        assert!(matches!(
            resolve_sources(&[dir.path().join("nope")]),
            Err(Error::SourceMissing { .. })
        ));
        assert!(matches!(
            resolve_sources(&[file]),
            Err(Error::SourceNotDirectory { .. })
        ));
    }

    #[test]
    fn test_resolve_defaults() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        let dest = dir.path().join("dest");

        let cli = parse(&dest, &src, &[]);
        let args = Arguments::resolve(&cli, &Config::default(), &clock()).unwrap();

        assert_eq!(args.destination, dest);
        assert_eq!(args.sources, vec![src]);
        assert_eq!(args.title, "Album");
        assert_eq!(args.initials, "A");
        assert_eq!(args.year, "2021");
        assert_eq!(args.month, "03");
    }

    #[test]
    fn test_resolve_explicit_values() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();

        let cli = parse(
            dir.path(),
            &src,
            &["--title", "summer in Paris", "--year", "812", "--month", "7"],
        );
        let args = Arguments::resolve(&cli, &Config::default(), &clock()).unwrap();

        assert_eq!(args.title, "summer in Paris");
        assert_eq!(args.initials, "P");
        assert_eq!(args.year, "0812");
        assert_eq!(args.month, "07");

        let cli = parse(dir.path(), &src, &["--title", "lowercase", "--initials", "jd"]);
        let args = Arguments::resolve(&cli, &Config::default(), &clock()).unwrap();
        assert_eq!(args.initials, "jd");
    }

    #[test]
    fn test_resolve_config_initials() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();

        let cli = parse(dir.path(), &src, &[]);
        let config = Config {
            title: "Road Trip".into(),
            initials: Some("ZZ".into()),
            ..Config::default()
        };
        let args = Arguments::resolve(&cli, &config, &clock()).unwrap();
        assert_eq!(args.title, "Road Trip");
        assert_eq!(args.initials, "ZZ");
    }
}
