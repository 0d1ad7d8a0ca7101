//! Complete-document scaffolding around a rendered body.

use crate::metadata::Metadata;

use super::escape::push_escaped;

/// Metadata keys that configure other stages and never become `<meta>`.
const SUPPRESSED_KEYS: &[&str] = &[
    "baseheaderlevel",
    "bibtex",
    "htmlfooter",
    "htmlheaderlevel",
    "lang",
    "latexbegin",
    "latexconfig",
    "latexfooter",
    "latexheaderlevel",
    "latexinput",
    "latexleader",
    "latexmode",
    "mmdfooter",
    "mmdheader",
    "quoteslanguage",
    "transcludebase",
    "xhtmlheaderlevel",
];

/// Write the doctype, `<head>` built from metadata and the opening `<body>`.
pub(super) fn push_head(out: &mut String, meta: &Metadata) {
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n\t<meta charset=\"utf-8\"/>\n");

    for (key, value) in meta.iter() {
        match key {
            "css" => {
                out.push_str("\t<link type=\"text/css\" rel=\"stylesheet\" href=\"");
                push_escaped(out, value);
                out.push_str("\"/>\n");
            }
            "title" => {
                out.push_str("\t<title>");
                push_escaped(out, value);
                out.push_str("</title>\n");
            }
            "htmlheader" | "xhtmlheader" => {
                out.push_str(value);
                out.push('\n');
            }
            key if SUPPRESSED_KEYS.contains(&key) => {}
            _ => {
                out.push_str("\t<meta name=\"");
                push_escaped(out, key);
                out.push_str("\" content=\"");
                push_escaped(out, value);
                out.push_str("\"/>\n");
            }
        }
    }

    out.push_str("</head>\n<body>\n\n");
}

pub(super) fn push_foot(out: &mut String) {
    out.push_str("\n\n</body>\n</html>\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_from_metadata() {
        let meta = Metadata::new()
            .with("Title", "Cats & Dogs")
            .with("CSS", "style.css")
            .with("Author", "Someone")
            .with("Base Header Level", "2")
            .with("HTML Header", "<script src=\"x.js\"></script>");

        let mut out = String::new();
        push_head(&mut out, &meta);

        assert!(out.starts_with("<!DOCTYPE html>\n<html>\n<head>\n\t<meta charset=\"utf-8\"/>\n"));
        assert!(out.contains("\t<title>Cats &amp; Dogs</title>\n"));
        assert!(out.contains("\t<link type=\"text/css\" rel=\"stylesheet\" href=\"style.css\"/>\n"));
        assert!(out.contains("\t<meta name=\"author\" content=\"Someone\"/>\n"));
        assert!(out.contains("<script src=\"x.js\"></script>\n"));
        assert!(!out.contains("baseheaderlevel"));
        assert!(out.ends_with("</head>\n<body>\n\n"));
    }

    #[test]
    fn test_foot() {
        let mut out = String::new();
        push_foot(&mut out);
        assert_eq!(out, "\n\n</body>\n</html>\n");
    }
}
