//! npm package name validation.
//!
//! Names that break the current rules fall in two groups:
//! - errors: the registry refuses them outright
//! - warnings: legacy names that existing packages may still carry

/// Maximum length for new package names.
pub const MAX_NAME_LENGTH: usize = 214;

const BLACKLIST: &[&str] = &["node_modules", "favicon.ico"];

/// Node.js built-in module names.
const BUILTINS: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Outcome of validating a package name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameValidation {
    /// Violations that make the name unpublishable.
    pub errors: Vec<String>,
    /// Legacy-name problems that do not block publishing.
    pub warnings: Vec<String>,
}

impl NameValidation {
    /// A name is acceptable when it has no hard errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a package name according to npm rules.
pub fn validate_package_name(name: &str) -> NameValidation {
    let mut result = NameValidation::default();
    let errors = &mut result.errors;
    let warnings = &mut result.warnings;

    if name.is_empty() {
        errors.push("name length must be greater than zero".to_string());
    }

    if name.starts_with('.') {
        errors.push("name cannot start with a period".to_string());
    }

    if name.starts_with('_') {
        errors.push("name cannot start with an underscore".to_string());
    }

    if name.trim() != name {
        errors.push("name cannot contain leading or trailing spaces".to_string());
    }

    let lowercase = name.to_lowercase();

    for blacklisted in BLACKLIST {
        if lowercase == *blacklisted {
            errors.push(format!("{} is a blacklisted name", blacklisted));
        }
    }

    for builtin in BUILTINS {
        if lowercase == *builtin {
            warnings.push(format!("{} is a core module name", builtin));
        }
    }

    // npm counts UTF-16 code units
    if name.encode_utf16().count() > MAX_NAME_LENGTH {
        warnings.push(format!(
            "name can no longer contain more than {} characters",
            MAX_NAME_LENGTH
        ));
    }

    if lowercase != name {
        warnings.push("name can no longer contain capital letters".to_string());
    }

    let last_segment = name.rsplit('/').next().unwrap_or(name);
    if last_segment.contains(['~', '\'', '!', '(', ')', '*']) {
        warnings.push(
            "name can no longer contain special characters (\"~'!()*\")".to_string(),
        );
    }

    if let Some((_, package)) = name.strip_prefix('@').and_then(|rest| rest.split_once('/')) {
        if package.starts_with('.') {
            errors.push("name cannot start with a period".to_string());
        }
    }

    if !is_uri_component(name) && !is_url_friendly_scoped(name) {
        errors.push("name can only contain URL-friendly characters".to_string());
    }

    result
}

/// True when `encodeURIComponent(s) == s`.
fn is_uri_component(s: &str) -> bool {
    s.chars().all(|c| {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')')
    })
}

/// `@scope/pkg` where both halves are URL-friendly on their own.
fn is_url_friendly_scoped(name: &str) -> bool {
    let Some(rest) = name.strip_prefix('@') else {
        return false;
    };
    let Some((scope, package)) = rest.split_once('/') else {
        return false;
    };

    !scope.is_empty()
        && !package.is_empty()
        && is_uri_component(scope)
        && is_uri_component(package)
}
