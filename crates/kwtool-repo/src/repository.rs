use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use kwtool_keywords::{KeywordResult, PackageQuery};
use tracing::{debug, debug_span, trace, warn};

use crate::atom::Atom;
use crate::ebuild::Ebuild;
use crate::errors::{RepoError, RepoResult};

/// Top-level directories of a repository that never hold packages
const NON_CATEGORY_DIRS: [&str; 7] = [
    "distfiles",
    "eclass",
    "licenses",
    "metadata",
    "packages",
    "profiles",
    "scripts",
];

fn sorted_entries(dir: &Path) -> RepoResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| RepoError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut ret = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| RepoError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_none_or(|name| name.starts_with('.'));
        if !hidden {
            ret.push(path);
        }
    }

    ret.sort();
    Ok(ret)
}

/// An ebuild tree laid out as `category/package/package-version.ebuild`, loaded into memory.
#[derive(Debug)]
pub struct Repository {
    root: PathBuf,
    /// Keyed by `category/package`, ebuilds in ascending version order
    packages: IndexMap<String, Vec<Ebuild>>,
}

impl Repository {
    pub fn open<P: AsRef<Path>>(root: P) -> RepoResult<Repository> {
        let root = root.as_ref();
        let _span = debug_span!("repository", root = %root.display()).entered();

        let mut ebuilds = Vec::new();
        for category in sorted_entries(root)? {
            let skipped = category
                .file_name()
                .and_then(|name| name.to_str())
                .is_none_or(|name| NON_CATEGORY_DIRS.contains(&name));
            if skipped || !category.is_dir() {
                continue;
            }

            for package in sorted_entries(&category)? {
                if !package.is_dir() {
                    continue;
                }

                for file in sorted_entries(&package)? {
                    if file.extension().is_none_or(|ext| ext != "ebuild") {
                        continue;
                    }

                    match Ebuild::from_file(&file) {
                        Ok(ebuild) => ebuilds.push(ebuild),
                        Err(err)
                            if matches!(
                                err.downcast_ref::<RepoError>(),
                                Some(RepoError::InvalidEbuildName { .. })
                            ) =>
                        {
                            warn!("{err}, skipping")
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
        }

        let repo = Repository::from_ebuilds(root, ebuilds);
        debug!(packages = repo.len(), ebuilds = repo.ebuilds().count(), "loaded");
        Ok(repo)
    }

    pub fn from_ebuilds<P, I>(root: P, ebuilds: I) -> Repository
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = Ebuild>,
    {
        let mut packages: IndexMap<String, Vec<Ebuild>> = IndexMap::new();
        for ebuild in ebuilds {
            packages.entry(ebuild.cpv().cpn()).or_default().push(ebuild);
        }

        for versions in packages.values_mut() {
            versions.sort();
        }
        packages.sort_keys();

        Repository {
            root: root.into(),
            packages,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of distinct packages
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    pub fn ebuilds(&self) -> impl Iterator<Item = &Ebuild> {
        self.packages.values().flatten()
    }

    /// Every ebuild matching `query`, grouped by package in ascending version order. A query
    /// without a category is a bare package name and matches that package in any category.
    pub fn lookup(&self, query: &str) -> RepoResult<Vec<&Ebuild>> {
        let ret: Vec<&Ebuild> = if query.contains('/') {
            let atom = Atom::parse(query)?;
            self.packages
                .get(&atom.cpn())
                .into_iter()
                .flatten()
                .filter(|ebuild| atom.matches(ebuild))
                .collect()
        } else {
            self.packages
                .values()
                .flatten()
                .filter(|ebuild| ebuild.cpv().package == query)
                .collect()
        };

        trace!(query, matches = ret.len());
        Ok(ret)
    }
}

impl PackageQuery for Repository {
    type Candidate<'a>
        = &'a Ebuild
    where
        Self: 'a;

    fn find<'a>(&'a self, atom: &str) -> KeywordResult<Vec<&'a Ebuild>> {
        self.lookup(atom)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::atom::Cpv;
    use crate::ebuild::Ebuild;
    use crate::repository::Repository;

    fn repo() -> Repository {
        let ebuild = |cpv: &str, slot: &str| {
            Ebuild::parse(Cpv::parse(cpv).unwrap(), &format!("SLOT=\"{slot}\""))
        };
        Repository::from_ebuilds(
            "/nonexistent",
            [
                ebuild("dev-libs/foo-2.0", "2"),
                ebuild("dev-libs/foo-1.0", "1"),
                ebuild("dev-libs/foo-1.0-r1", "1"),
                ebuild("app-misc/foo-0.1", "0"),
                ebuild("app-misc/bar-3", "0"),
            ],
        )
    }

    fn lookup(repo: &Repository, query: &str) -> Vec<String> {
        repo.lookup(query)
            .unwrap()
            .into_iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn grouping() {
        let repo = repo();
        assert_eq!(repo.len(), 3);
        assert_eq!(
            repo.packages().collect::<Vec<_>>(),
            vec!["app-misc/bar", "app-misc/foo", "dev-libs/foo"]
        );
        assert_eq!(repo.ebuilds().count(), 5);
    }

    #[test]
    fn atoms() {
        let repo = repo();
        assert_eq!(
            lookup(&repo, "dev-libs/foo"),
            vec!["dev-libs/foo-1.0", "dev-libs/foo-1.0-r1", "dev-libs/foo-2.0"]
        );
        assert_eq!(
            lookup(&repo, "<dev-libs/foo-2"),
            vec!["dev-libs/foo-1.0", "dev-libs/foo-1.0-r1"]
        );
        assert_eq!(lookup(&repo, "dev-libs/foo:2"), vec!["dev-libs/foo-2.0"]);
        assert!(lookup(&repo, "dev-libs/missing").is_empty());
    }

    #[test]
    fn bare_names() {
        let repo = repo();
        assert_eq!(
            lookup(&repo, "foo"),
            vec![
                "app-misc/foo-0.1",
                "dev-libs/foo-1.0",
                "dev-libs/foo-1.0-r1",
                "dev-libs/foo-2.0"
            ]
        );
        assert_eq!(lookup(&repo, "bar"), vec!["app-misc/bar-3"]);
    }

    #[test]
    fn invalid_atom() {
        assert!(repo().lookup(">=dev-libs/foo").is_err());
    }
}
