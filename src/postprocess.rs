use crate::config::Config;
use anyhow::Result;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

pub fn scrub_markdown(cfg: &Config, raw: String) -> Result<String> {
    let mut md = raw;

    if cfg.postprocess.normalize_newlines {
        md = md.replace("\r\n", "\n");
    }

    if cfg.postprocess.normalize_unicode {
        md = md.nfkc().collect::<String>();
    }

    if cfg.postprocess.trim_trailing_whitespace {
        md = md
            .lines()
            .map(|l| l.trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n");
    }

    if cfg.postprocess.remove_by_regex {
        md = remove_by_regex(cfg, &md)?;
    }

    Ok(md)
}

fn remove_by_regex(cfg: &Config, s: &str) -> Result<String> {
    let regs: Vec<Regex> = cfg
        .postprocess
        .regex
        .patterns
        .iter()
        .map(|p| Regex::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut out = Vec::new();
    for line in s.lines() {
        let mut matched = false;
        for r in &regs {
            if r.is_match(line.trim()) {
                matched = true;
                break;
            }
        }
        if !matched {
            out.push(line);
        }
    }
    Ok(out.join("\n"))
}

/// Plain-text rendition for the .txt download: markdown syntax stripped,
/// line structure kept.
pub fn markdown_to_text(_cfg: &Config, md: &str) -> Result<String> {
    let link = Regex::new(r"!?\[([^\]]*)\]\([^)]*\)")?;
    let mut s = link.replace_all(md, "$1").into_owned();
    s = s.replace("**", "");
    s = s.replace('`', "");

    let mut out = Vec::new();
    for line in s.lines() {
        let stripped = line.trim_start_matches('#');
        if stripped.len() != line.len() {
            out.push(stripped.trim_start());
        } else {
            out.push(line);
        }
    }
    Ok(out.join("\n"))
}
