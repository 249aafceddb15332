//! English word inflection for relation and type names.
//!
//! Wire type names arrive pluralized and underscored (`ssh_certificates`);
//! type identifiers are singular and camel-cased (`SshCertificate`). These
//! helpers convert between the two using the Rails inflection rule tables:
//! ordered suffix rewrites where the first matching rule wins, preceded by
//! irregular pairs and guarded by a list of uncountable words.

use std::sync::OnceLock;

use regex::Regex;

/// Plural rewrites, most specific first.
const PLURAL_RULES: &[(&str, &str)] = &[
    (r"(?i)(quiz)$", "${1}zes"),
    (r"(?i)^(oxen)$", "${1}"),
    (r"(?i)^(ox)$", "${1}en"),
    (r"(?i)(m|l)ice$", "${1}ice"),
    (r"(?i)(m|l)ouse$", "${1}ice"),
    (r"(?i)(passer)s?by$", "${1}sby"),
    (r"(?i)(matr|vert|ind)(?:ix|ex)$", "${1}ices"),
    (r"(?i)(x|ch|ss|sh)$", "${1}es"),
    (r"(?i)([^aeiouy]|qu)y$", "${1}ies"),
    (r"(?i)(hive)$", "${1}s"),
    (r"(?i)([lr])f$", "${1}ves"),
    (r"(?i)([^f])fe$", "${1}ves"),
    (r"(?i)sis$", "ses"),
    (r"(?i)([ti])a$", "${1}a"),
    (r"(?i)([ti])um$", "${1}a"),
    (r"(?i)(buffal|potat|tomat)o$", "${1}oes"),
    (r"(?i)(bu)s$", "${1}ses"),
    (r"(?i)(alias|status)$", "${1}es"),
    (r"(?i)(octop|vir)i$", "${1}i"),
    (r"(?i)(octop|vir)us$", "${1}i"),
    (r"(?i)^(ax|test)is$", "${1}es"),
    (r"(?i)s$", "s"),
    (r"$", "s"),
];

/// Singular rewrites, most specific first.
const SINGULAR_RULES: &[(&str, &str)] = &[
    (r"(?i)(database)s$", "${1}"),
    (r"(?i)(quiz)zes$", "${1}"),
    (r"(?i)(matr)ices$", "${1}ix"),
    (r"(?i)(vert|ind)ices$", "${1}ex"),
    (r"(?i)(passer)sby$", "${1}by"),
    (r"(?i)^(ox)en", "${1}"),
    (r"(?i)(alias|status)(es)?$", "${1}"),
    (r"(?i)(octop|vir)(us|i)$", "${1}us"),
    (r"(?i)^(a)x[ie]s$", "${1}xis"),
    (r"(?i)(cris|test)(is|es)$", "${1}is"),
    (r"(?i)(shoe)s$", "${1}"),
    (r"(?i)(o)es$", "${1}"),
    (r"(?i)(bus)(es)?$", "${1}"),
    (r"(?i)(m|l)ice$", "${1}ouse"),
    (r"(?i)(x|ch|ss|sh)es$", "${1}"),
    (r"(?i)(m)ovies$", "${1}ovie"),
    (r"(?i)(s)eries$", "${1}eries"),
    (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
    (r"(?i)([lr])ves$", "${1}f"),
    (r"(?i)(tive)s$", "${1}"),
    (r"(?i)(hive)s$", "${1}"),
    (r"(?i)([^f])ves$", "${1}fe"),
    (r"(?i)(t)he(sis|ses)$", "${1}hesis"),
    (r"(?i)(s)ynop(sis|ses)$", "${1}ynopsis"),
    (r"(?i)(p)rogno(sis|ses)$", "${1}rognosis"),
    (r"(?i)(p)arenthe(sis|ses)$", "${1}arenthesis"),
    (r"(?i)(d)iagno(sis|ses)$", "${1}iagnosis"),
    (r"(?i)(b)a(sis|ses)$", "${1}asis"),
    (r"(?i)(a)naly(sis|ses)$", "${1}nalysis"),
    (r"(?i)([ti])a$", "${1}um"),
    (r"(?i)(n)ews$", "${1}ews"),
    (r"(?i)(ss)$", "${1}"),
    (r"(?i)s$", ""),
];

/// Irregular (singular, plural) pairs. Later pairs take precedence.
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("human", "humans"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
    ("cow", "kine"),
    ("zombie", "zombies"),
];

/// Words with identical singular and plural forms.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "fish",
    "information",
    "jeans",
    "money",
    "rice",
    "series",
    "sheep",
    "species",
];

/// A suffix rewrite.
struct Rule {
    pattern: Regex,
    replacement: String,
}

impl Rule {
    fn new(pattern: &str, replacement: impl Into<String>) -> Self {
        Self {
            // Every pattern is a literal from the tables above
            pattern: Regex::new(pattern).expect("inflection rule is a valid pattern"),
            replacement: replacement.into(),
        }
    }
}

/// The compiled rule tables, irregular pairs first.
struct Inflections {
    plurals: Vec<Rule>,
    singulars: Vec<Rule>,
}

impl Inflections {
    fn build() -> Self {
        let mut plurals = Vec::with_capacity(PLURAL_RULES.len() + 4 * IRREGULAR.len());
        let mut singulars = Vec::with_capacity(SINGULAR_RULES.len() + 2 * IRREGULAR.len());

        for &(singular, plural) in IRREGULAR.iter().rev() {
            let (s_head, s_tail) = singular.split_at(1);
            let (p_head, p_tail) = plural.split_at(1);

            if s_head.eq_ignore_ascii_case(p_head) {
                plurals.push(Rule::new(
                    &format!("(?i)({p_head}){p_tail}$"),
                    format!("${{1}}{p_tail}"),
                ));
                plurals.push(Rule::new(
                    &format!("(?i)({s_head}){s_tail}$"),
                    format!("${{1}}{p_tail}"),
                ));
                singulars.push(Rule::new(
                    &format!("(?i)({p_head}){p_tail}$"),
                    format!("${{1}}{s_tail}"),
                ));
            } else {
                // The leading letter changes, so its case is matched explicitly
                for (s_head, p_head) in [
                    (s_head.to_uppercase(), p_head.to_uppercase()),
                    (s_head.to_lowercase(), p_head.to_lowercase()),
                ] {
                    plurals.push(Rule::new(
                        &format!("{p_head}(?i:{p_tail})$"),
                        format!("{p_head}{p_tail}"),
                    ));
                    plurals.push(Rule::new(
                        &format!("{s_head}(?i:{s_tail})$"),
                        format!("{p_head}{p_tail}"),
                    ));
                    singulars.push(Rule::new(
                        &format!("{p_head}(?i:{p_tail})$"),
                        format!("{s_head}{s_tail}"),
                    ));
                }
            }
        }

        plurals.extend(PLURAL_RULES.iter().map(|&(p, r)| Rule::new(p, r)));
        singulars.extend(SINGULAR_RULES.iter().map(|&(p, r)| Rule::new(p, r)));

        Self { plurals, singulars }
    }
}

fn inflections() -> &'static Inflections {
    static INFLECTIONS: OnceLock<Inflections> = OnceLock::new();
    INFLECTIONS.get_or_init(Inflections::build)
}

/// Splits off the last word of an underscored or camel-cased identifier.
fn split_last_word(word: &str) -> (&str, &str) {
    if let Some(idx) = word.rfind('_') {
        return word.split_at(idx + 1);
    }
    let idx = word
        .char_indices()
        .filter(|(_, c)| c.is_uppercase())
        .map(|(i, _)| i)
        .last()
        .unwrap_or(0);
    word.split_at(idx)
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Rewrites `word` with the first matching rule. Empty and uncountable
/// words come back unchanged; only the last word of a compound name is
/// checked against the uncountable list.
fn apply_rules(word: &str, rules: &[Rule]) -> String {
    let (_, last) = split_last_word(word);
    if word.is_empty() || UNCOUNTABLE.contains(&last.to_lowercase().as_str()) {
        return word.to_string();
    }

    rules
        .iter()
        .find(|rule| rule.pattern.is_match(word))
        .map_or_else(
            || word.to_string(),
            |rule| {
                rule.pattern
                    .replace(word, rule.replacement.as_str())
                    .into_owned()
            },
        )
}

/// Returns the singular form of a word.
///
/// ```rust
/// use hal_api::hal::inflect::singularize;
///
/// assert_eq!(singularize("ssh_certificates"), "ssh_certificate");
/// assert_eq!(singularize("Policies"), "Policy");
/// assert_eq!(singularize("statuses"), "status");
/// assert_eq!(singularize("analyses"), "analysis");
/// assert_eq!(singularize("backup"), "backup");
/// ```
#[must_use]
pub fn singularize(word: &str) -> String {
    apply_rules(word, &inflections().singulars)
}

/// Returns the plural form of a word. Words that already look plural are
/// left alone.
///
/// ```rust
/// use hal_api::hal::inflect::pluralize;
///
/// assert_eq!(pluralize("backup"), "backups");
/// assert_eq!(pluralize("backups"), "backups");
/// assert_eq!(pluralize("ssh_certificate"), "ssh_certificates");
/// assert_eq!(pluralize("policy"), "policies");
/// assert_eq!(pluralize("status"), "statuses");
/// assert_eq!(pluralize("analysis"), "analyses");
/// ```
#[must_use]
pub fn pluralize(word: &str) -> String {
    apply_rules(word, &inflections().plurals)
}

/// Converts an underscored word to its camel-cased type form.
///
/// ```rust
/// use hal_api::hal::inflect::camelize;
///
/// assert_eq!(camelize("ssh_certificates"), "SshCertificates");
/// assert_eq!(camelize("app"), "App");
/// assert_eq!(camelize("SshCertificate"), "SshCertificate");
/// ```
#[must_use]
pub fn camelize(word: &str) -> String {
    word.split(['_', '-'])
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect()
}

/// Converts a camel-cased word to its underscored form.
///
/// ```rust
/// use hal_api::hal::inflect::underscore;
///
/// assert_eq!(underscore("SshCertificate"), "ssh_certificate");
/// assert_eq!(underscore("HTTPServer"), "http_server");
/// assert_eq!(underscore("already_snake"), "already_snake");
/// ```
#[must_use]
pub fn underscore(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    let mut out = String::with_capacity(word.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' {
            out.push('_');
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }

    out
}
