//! Script form parser.
//!
//! Each top-level form describes one keyword. Its elements are read
//! positionally:
//!
//! ```text
//! (KEY MEMORY rule...)              memory rules for KEY
//! (MEMORY KEY rule...)              same, older spelling
//! (KEY [= ALIAS] DLIST (TAG...))    KEY joins every TAG; nothing may follow
//! (KEY [= ALIAS] [RANK] rule...)    substitution, rank and response rules
//! ```
//!
//! A response rule is either a redirection, `(=TARGET)` / `(= TARGET)` /
//! `(TARGET)`, which must be the entry's only rule, or a pattern rule
//! `((decomposition) (reassembly)...)`. Reassemblies are classified from their
//! flattened text: `=TARGET`, `PRE (...) (=TARGET)`, `NEWKEY`, or plain text.
//!
//! A bare `STOP` symbol or an empty list at top level ends parsing early.

use super::{EntryPatch, Script};
use crate::error::{Result, ScriptError};
use crate::pattern::{Decomposition, Template};
use crate::sexp::{self, Sexp};
use crate::{Options, Reassembly, ReassemblyList, Rule};
use tracing::{debug, trace};

const MEMORY: &str = "MEMORY";
const DLIST: &str = "DLIST";

/// Parse every form in `text` into `script`.
pub(super) fn parse_into(script: &mut Script, text: &str, options: &Options) -> Result<()> {
    for form in sexp::read_all(text)? {
        if form.is_symbol("STOP") || form.is_empty_list() {
            debug!(form = %form, "stop marker reached, ignoring the rest of the script");
            break;
        }
        parse_entry(script, &form, options)?;
    }
    Ok(())
}

fn parse_entry(script: &mut Script, form: &Sexp, options: &Options) -> Result<()> {
    let malformed = || ScriptError::malformed_entry(form);

    let items = match form {
        Sexp::List(items) if items.len() > 1 => items.as_slice(),
        _ => return Err(malformed()),
    };
    let first = items[0].as_symbol().ok_or_else(malformed)?;

    if items[1].is_symbol(MEMORY) {
        return parse_memory(script, form, &first.to_uppercase(), &items[2..]);
    }
    if first == MEMORY {
        if let Some(keyword) = items[1].as_symbol().filter(|s| !matches!(*s, "=" | DLIST)) {
            return parse_memory(script, form, &keyword.to_uppercase(), &items[2..]);
        }
    }

    let keyword = first.to_uppercase();
    let mut patch = EntryPatch::default();
    let mut index = 1;

    if items[1].is_symbol("=") {
        let alias = items.get(2).and_then(Sexp::as_symbol).ok_or_else(malformed)?;
        patch.alias = Some(alias.to_uppercase());
        index = 3;
    }

    if items.get(index).is_some_and(|item| item.is_symbol(DLIST)) {
        let tags = match (items.get(index + 1), items.len() == index + 2) {
            (Some(Sexp::List(tags)), true) => tags,
            _ => return Err(malformed()),
        };
        for tag in tags {
            let tag = tag.as_symbol().ok_or_else(malformed)?;
            let tag = tag.trim_start_matches('/').to_uppercase();
            if !tag.is_empty() {
                script.add_category_member(&tag, &keyword);
            }
        }
        trace!(keyword = %keyword, tags = tags.len(), "category membership");
        script.update_entry(&keyword, patch);
        return Ok(());
    }

    if let Some(Sexp::Int(rank)) = items.get(index) {
        patch.rank = Some(u32::try_from(*rank).map_err(|_| malformed())?);
        index += 1;
    }

    // Something has to follow the keyword: an alias or at least one rule.
    if patch.alias.is_none() && items.len() <= index {
        return Err(malformed());
    }

    let rules = parse_response_rules(&items[index..])?;
    if !rules.is_empty() {
        patch.response_rules = Some(rules.into_iter().map(|rule| script.add_rule(rule)).collect());
    }

    if patch.rank.is_none() && !options.unranked_keywords.iter().any(|k| k.eq_ignore_ascii_case(&keyword)) {
        patch.rank = Some(options.default_rank);
    }

    trace!(keyword = %keyword, alias = ?patch.alias, rank = ?patch.rank, "entry");
    script.update_entry(&keyword, patch);
    Ok(())
}

fn parse_memory(script: &mut Script, form: &Sexp, keyword: &str, rules: &[Sexp]) -> Result<()> {
    if rules.is_empty() || !rules.iter().all(Sexp::is_list) {
        return Err(ScriptError::malformed_entry(form));
    }

    let mut ids = Vec::with_capacity(rules.len());
    for raw in rules {
        let rule = parse_pattern_rule(raw)?;
        if let Rule::Pattern { reassemblies, .. } = &rule {
            if !reassemblies.is_plain_text() {
                return Err(ScriptError::malformed_rule(raw));
            }
        }
        ids.push(script.add_rule(rule));
    }

    trace!(keyword = %keyword, rules = ids.len(), "memory rules");
    script.update_entry(keyword, EntryPatch { memory_rules: Some(ids), ..EntryPatch::default() });
    Ok(())
}

fn parse_response_rules(raw_rules: &[Sexp]) -> Result<Vec<Rule>> {
    let mut rules = Vec::with_capacity(raw_rules.len());

    for raw in raw_rules {
        let parts = raw.as_list().ok_or_else(|| ScriptError::malformed_rule(raw))?;

        if !parts.is_empty() && parts.iter().all(|part| part.as_symbol().is_some()) {
            let flat = raw.inner_text();
            let target = flat.trim_matches(|c: char| c == '=' || c.is_whitespace());
            if raw_rules.len() != 1 || target.is_empty() || target.contains(char::is_whitespace) {
                return Err(ScriptError::malformed_rule(raw));
            }
            rules.push(Rule::Redirect { target: target.to_uppercase() });
            continue;
        }

        rules.push(parse_pattern_rule(raw)?);
    }

    Ok(rules)
}

/// `((decomposition) (reassembly) ...)`
fn parse_pattern_rule(raw: &Sexp) -> Result<Rule> {
    let malformed = || ScriptError::malformed_rule(raw);

    let parts = raw.as_list().ok_or_else(malformed)?;
    if parts.len() < 2 || !parts.iter().all(Sexp::is_list) {
        return Err(malformed());
    }

    let decomposition = Decomposition::parse(&parts[0].inner_text()).ok_or_else(malformed)?;
    let items = parts[1..].iter().map(|item| classify_reassembly(&item.inner_text())).collect::<Option<Vec<_>>>();
    let reassemblies = items.and_then(ReassemblyList::new).ok_or_else(malformed)?;

    Ok(Rule::Pattern { decomposition, reassemblies })
}

/// Classify flattened reassembly text. `None` for a `PRE` form whose target
/// is not a single word.
fn classify_reassembly(text: &str) -> Option<Reassembly> {
    let text = text.trim();

    let redirect = regex!(concat!(r"^=\s*(", word_pattern!(), r")\s*$"));
    if let Some(caps) = redirect.captures(text) {
        return Some(Reassembly::Redirect(caps[1].to_uppercase()));
    }

    let preformat = regex!(r"^PRE\s*\(\s*(.*?)\s*\)\s*\(\s*=\s*(.*?)\s*\)$");
    if let Some(caps) = preformat.captures(text) {
        let target = &caps[2];
        if target.is_empty() || target.contains(char::is_whitespace) {
            return None;
        }
        return Some(Reassembly::Preformat { template: Template::compile(&caps[1]), target: target.to_uppercase() });
    }

    if text == "NEWKEY" {
        return Some(Reassembly::NewKey);
    }

    Some(Reassembly::Text(Template::compile(text)))
}
