use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use indexmap::IndexMap;
use itertools::Itertools;
use kwtool_keywords::{Candidate, KeywordResult};
use regex::{Captures, Regex};
use tracing::debug;

use crate::atom::{split_package_version, Cpv};
use crate::errors::{RepoError, RepoResult};

/// Variables holding dependency specifications, in the order they are joined by
/// [`Ebuild::all_depends`].
pub const DEPEND_VARIABLES: [&str; 5] = ["DEPEND", "RDEPEND", "BDEPEND", "PDEPEND", "IDEPEND"];

static ASSIGNMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:export[ \t]+)?(?P<name>[A-Za-z_][A-Za-z0-9_]*)(?P<op>\+?=)").unwrap()
});

/// `name() {` or a bare `name()` whose `{` opens the next line
static FUNCTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*[ \t]*\(\)[ \t]*(?:\{|$)").unwrap()
});

/// Escaped `\\` and `\$` are kept escaped by [`read_value`] and resolved here, in the same pass
/// as expansion
static EXPANSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\\(?P<escaped>[\\$])",
        r"|\$\{(?P<braced>[A-Za-z_][A-Za-z0-9_]*)\}",
        r"|\$(?P<bare>[A-Za-z_][A-Za-z0-9_]*)",
    ))
    .unwrap()
});

enum Quoting {
    Double,
    Single,
    Bare,
}

/// Read one shell word starting at `start`. Returns the unquoted value, how it was quoted and the
/// byte offset just past it. An unterminated quote runs to the end of the text.
fn read_value(text: &str, start: usize) -> (String, Quoting, usize) {
    let rest = &text[start..];
    match rest.chars().next() {
        Some('"') => {
            let mut value = String::new();
            let mut chars = rest.char_indices().skip(1);
            while let Some((idx, c)) = chars.next() {
                match c {
                    '"' => return (value, Quoting::Double, start + idx + 1),
                    '\\' => match chars.next() {
                        Some((_, '\n')) => {}
                        Some((_, escaped @ ('\\' | '$'))) => {
                            value.push('\\');
                            value.push(escaped);
                        }
                        Some((_, escaped @ ('"' | '`'))) => value.push(escaped),
                        Some((_, other)) => {
                            value.push('\\');
                            value.push(other);
                        }
                        None => value.push('\\'),
                    },
                    c => value.push(c),
                }
            }
            (value, Quoting::Double, text.len())
        }
        Some('\'') => match rest[1..].find('\'') {
            Some(idx) => (rest[1..idx + 1].to_string(), Quoting::Single, start + idx + 2),
            None => (rest[1..].to_string(), Quoting::Single, text.len()),
        },
        _ => {
            let len = rest
                .find(|c: char| c.is_whitespace() || c == ';')
                .unwrap_or(rest.len());
            (rest[..len].to_string(), Quoting::Bare, start + len)
        }
    }
}

/// A single package version read from an ebuild. Only global variable assignments are
/// understood: nothing is executed, `inherit` is not followed and function bodies are skipped.
#[derive(Debug, Clone)]
pub struct Ebuild {
    cpv: Cpv,
    path: Option<PathBuf>,
    variables: IndexMap<String, String>,
}

impl Ebuild {
    pub fn parse(cpv: Cpv, text: &str) -> Ebuild {
        let mut ebuild = Ebuild {
            variables: Ebuild::package_variables(&cpv),
            cpv,
            path: None,
        };

        let mut pos = 0;
        let mut in_function = false;
        while pos < text.len() {
            let line_end = text[pos..].find('\n').map_or(text.len(), |idx| pos + idx);
            let line = &text[pos..line_end];

            if in_function {
                in_function = !line.starts_with('}');
            } else if FUNCTION_REGEX.is_match(line) {
                in_function = !line.trim_end().ends_with('}');
            } else if let Some(captures) = ASSIGNMENT_REGEX.captures(line) {
                let value_start = pos + captures.get(0).map_or(0, |m| m.end());
                let (raw, quoting, value_end) = read_value(text, value_start);

                let value = match quoting {
                    Quoting::Single => raw,
                    Quoting::Double | Quoting::Bare => ebuild.expand(&raw),
                };
                ebuild.assign(&captures["name"], &captures["op"], value);

                // A quoted value may span several lines; resume after the line it ends on, or
                // after a `;` that follows it on the same line
                let next = text[value_end..]
                    .find('\n')
                    .map_or(text.len(), |idx| value_end + idx);
                pos = match text[value_end..next].trim_start().strip_prefix(';') {
                    Some(after) => next - after.len(),
                    None => next + 1,
                };
                continue;
            }

            pos = line_end + 1;
        }

        ebuild
    }

    /// Read `<category>/<package>/<package>-<version>.ebuild`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> RepoResult<Ebuild> {
        let path = path.as_ref();
        let invalid = || RepoError::InvalidEbuildName {
            path: path.to_path_buf(),
        };

        let package_dir = path.parent().ok_or_else(invalid)?;
        let package = package_dir
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(invalid)?;
        let category = package_dir
            .parent()
            .and_then(|dir| dir.file_name())
            .and_then(|name| name.to_str())
            .ok_or_else(invalid)?;

        let (name, version) = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(split_package_version)
            .ok_or_else(invalid)?;
        if name != package {
            return Err(invalid().into());
        }

        let text = fs::read_to_string(path).map_err(|source| RepoError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut ebuild = Ebuild::parse(Cpv::new(category, package, version), &text);
        ebuild.path = Some(path.to_path_buf());
        Ok(ebuild)
    }

    fn package_variables(cpv: &Cpv) -> IndexMap<String, String> {
        let pn = cpv.package.clone();
        let pv = cpv.version.without_revision().to_string();
        let pr = cpv.version.revision();
        let pvr = match cpv.version.has_revision() {
            true => format!("{pv}-{pr}"),
            false => pv.clone(),
        };

        IndexMap::from([
            ("CATEGORY".to_string(), cpv.category.clone()),
            ("P".to_string(), format!("{pn}-{pv}")),
            ("PF".to_string(), format!("{pn}-{pvr}")),
            ("PN".to_string(), pn),
            ("PV".to_string(), pv),
            ("PR".to_string(), pr),
            ("PVR".to_string(), pvr),
        ])
    }

    fn expand(&self, value: &str) -> String {
        EXPANSION_REGEX
            .replace_all(value, |captures: &Captures| {
                if let Some(escaped) = captures.name("escaped") {
                    return escaped.as_str().to_string();
                }

                let name = captures
                    .name("braced")
                    .or_else(|| captures.name("bare"))
                    .map_or("", |name| name.as_str());
                match self.variables.get(name) {
                    Some(value) => value.clone(),
                    None => {
                        debug!(cpv = %self.cpv, variable = name, "expanding unset variable");
                        String::new()
                    }
                }
            })
            .into_owned()
    }

    fn assign(&mut self, name: &str, op: &str, value: String) {
        match op {
            "+=" => self.variables.entry(name.to_string()).or_default().push_str(&value),
            _ => {
                self.variables.insert(name.to_string(), value);
            }
        }
    }

    pub fn cpv(&self) -> &Cpv {
        &self.cpv
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn variables(&self) -> &IndexMap<String, String> {
        &self.variables
    }

    /// `SLOT` without its subslot, `0` when unset
    pub fn slot(&self) -> &str {
        match self.var("SLOT").map(|slot| slot.trim()) {
            Some(slot) if !slot.is_empty() => slot.split_once('/').map_or(slot, |(slot, _)| slot),
            _ => "0",
        }
    }

    /// The subslot, which defaults to the slot
    pub fn subslot(&self) -> &str {
        self.var("SLOT")
            .and_then(|slot| slot.trim().split_once('/'))
            .map_or_else(|| self.slot(), |(_, subslot)| subslot)
    }

    /// Every dependency variable joined into one specification
    pub fn all_depends(&self) -> String {
        DEPEND_VARIABLES
            .iter()
            .filter_map(|name| self.var(name))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .join(" ")
    }
}

impl Ord for Ebuild {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cpv
            .version
            .cmp(&other.cpv.version)
            .then_with(|| self.cpv.category.cmp(&other.cpv.category))
            .then_with(|| self.cpv.package.cmp(&other.cpv.package))
            .then_with(|| self.cpv.version.as_str().cmp(other.cpv.version.as_str()))
    }
}

impl PartialOrd for Ebuild {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ebuild {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ebuild {}

impl fmt::Display for Ebuild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.cpv, f)
    }
}

impl Candidate for Ebuild {
    fn keywords(&self) -> KeywordResult<Option<Cow<'_, str>>> {
        Ok(self.var("KEYWORDS").map(Cow::Borrowed))
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::atom::Cpv;
    use crate::ebuild::Ebuild;

    fn parse(cpv: &str, text: &str) -> Ebuild {
        Ebuild::parse(Cpv::parse(cpv).unwrap(), text)
    }

    #[test]
    fn assignments() {
        let ebuild = parse(
            "dev-libs/foo-1.2-r1",
            r#"
# Copyright header
EAPI=8

inherit autotools

DESCRIPTION="A test package"
SLOT='0/1.2'
KEYWORDS="~amd64 x86"
IUSE="ssl test"
"#,
        );

        assert_eq!(ebuild.var("EAPI"), Some("8"));
        assert_eq!(ebuild.var("DESCRIPTION"), Some("A test package"));
        assert_eq!(ebuild.var("KEYWORDS"), Some("~amd64 x86"));
        assert_eq!(ebuild.slot(), "0");
        assert_eq!(ebuild.subslot(), "1.2");
        assert_eq!(ebuild.var("inherit"), None);
    }

    #[test]
    fn package_variables() {
        let ebuild = parse("dev-libs/foo-1.2-r1", "");
        assert_eq!(ebuild.var("CATEGORY"), Some("dev-libs"));
        assert_eq!(ebuild.var("P"), Some("foo-1.2"));
        assert_eq!(ebuild.var("PN"), Some("foo"));
        assert_eq!(ebuild.var("PV"), Some("1.2"));
        assert_eq!(ebuild.var("PR"), Some("r1"));
        assert_eq!(ebuild.var("PVR"), Some("1.2-r1"));
        assert_eq!(ebuild.var("PF"), Some("foo-1.2-r1"));

        let ebuild = parse("dev-libs/foo-1.2", "");
        assert_eq!(ebuild.var("PR"), Some("r0"));
        assert_eq!(ebuild.var("PVR"), Some("1.2"));
    }

    #[test]
    fn multiline_dependencies() {
        let ebuild = parse(
            "dev-libs/foo-1.0",
            r#"
RDEPEND="
	dev-libs/bar
	|| (
		dev-libs/baz
		dev-libs/qux
	)
"
DEPEND="${RDEPEND}
	test? ( dev-util/checker )"
BDEPEND="virtual/pkgconfig"
"#,
        );

        assert_eq!(
            ebuild.all_depends().split_whitespace().collect::<Vec<_>>(),
            vec![
                "dev-libs/bar",
                "||",
                "(",
                "dev-libs/baz",
                "dev-libs/qux",
                ")",
                "test?",
                "(",
                "dev-util/checker",
                ")",
                "dev-libs/bar",
                "||",
                "(",
                "dev-libs/baz",
                "dev-libs/qux",
                ")",
                "virtual/pkgconfig",
            ]
        );
    }

    #[test]
    fn expansion_and_append() {
        let ebuild = parse(
            "dev-libs/foo-1.0",
            r#"
MY_DEP=">=dev-libs/bar-${PV}"
RDEPEND="${MY_DEP} $UNSET"
RDEPEND+=" dev-libs/baz"
LITERAL='${PV}'
"#,
        );

        assert_eq!(
            ebuild.var("RDEPEND"),
            Some(">=dev-libs/bar-1.0  dev-libs/baz")
        );
        assert_eq!(ebuild.var("LITERAL"), Some("${PV}"));
        assert_eq!(ebuild.all_depends(), ">=dev-libs/bar-1.0  dev-libs/baz");
    }

    #[test]
    fn functions_are_skipped() {
        let ebuild = parse(
            "dev-libs/foo-1.0",
            r#"
KEYWORDS="x86"

src_configure() {
	KEYWORDS="broken"
	local myconf=( --enable-foo )
}

pkg_setup() { :; }

SLOT="2"
"#,
        );

        assert_eq!(ebuild.var("KEYWORDS"), Some("x86"));
        assert_eq!(ebuild.var("myconf"), None);
        assert_eq!(ebuild.slot(), "2");
        assert_eq!(ebuild.subslot(), "2");
    }

    #[test]
    fn function_brace_on_next_line() {
        let ebuild = parse(
            "dev-libs/foo-1.0",
            "KEYWORDS=\"x86\"\nsrc_install()\n{\n\tKEYWORDS=\"broken\"\n}\nSLOT=\"3\"\n",
        );

        assert_eq!(ebuild.var("KEYWORDS"), Some("x86"));
        assert_eq!(ebuild.slot(), "3");
    }

    #[test]
    fn escaped_expansions() {
        let ebuild = parse(
            "dev-libs/foo-1.0",
            r#"
DESCRIPTION="literal \$PN here"
WINDOWS="C:\\$PN"
BARE=\$PV
"#,
        );

        assert_eq!(ebuild.var("DESCRIPTION"), Some("literal $PN here"));
        assert_eq!(ebuild.var("WINDOWS"), Some(r"C:\foo"));
        assert_eq!(ebuild.var("BARE"), Some("$PV"));
    }

    #[test]
    fn several_assignments_per_line() {
        let ebuild = parse(
            "dev-libs/foo-1.0",
            "EAPI=8; SLOT=\"0/1\";KEYWORDS=\"x86\"\nIUSE=\"ssl\" ;\n",
        );

        assert_eq!(ebuild.var("EAPI"), Some("8"));
        assert_eq!(ebuild.subslot(), "1");
        assert_eq!(ebuild.var("KEYWORDS"), Some("x86"));
        assert_eq!(ebuild.var("IUSE"), Some("ssl"));
    }

    #[test]
    fn escapes() {
        let ebuild = parse(
            "dev-libs/foo-1.0",
            "DESCRIPTION=\"say \\\"hi\\\" \\\n  twice\"\nSLOT=\"\"\n",
        );
        assert_eq!(ebuild.var("DESCRIPTION"), Some("say \"hi\"   twice"));
        assert_eq!(ebuild.slot(), "0");
    }

    #[test]
    fn ordering() {
        let mut ebuilds = vec![
            parse("dev-libs/foo-1.10", ""),
            parse("dev-libs/foo-1.2-r1", ""),
            parse("dev-libs/foo-1.2", ""),
        ];
        ebuilds.sort();

        assert_eq!(
            ebuilds.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["dev-libs/foo-1.2", "dev-libs/foo-1.2-r1", "dev-libs/foo-1.10"]
        );
    }
}
