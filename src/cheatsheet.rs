use crate::engine::cipher_map::CipherMap;
use crate::engine::mnemonic::{Hint, MnemonicResolver};

/// Every `(plain, cipher)` pair with its mnemonic, sorted by cipher symbol.
pub fn build(cipher: &CipherMap, resolver: &MnemonicResolver<'_>) -> Vec<Hint> {
    let mut pairs: Vec<(char, char)> = cipher.pairs().collect();
    pairs.sort_by_key(|&(_, image)| image);
    pairs
        .into_iter()
        .map(|(plain, image)| Hint {
            plain,
            cipher: image,
            mnemonic: resolver.resolve_pair(plain, image),
        })
        .collect()
}

fn spaced(entries: &[Hint], pick: impl Fn(&Hint) -> char) -> String {
    entries
        .iter()
        .map(|h| pick(h).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_text(entries: &[Hint]) -> String {
    let mut out = format!(
        "{}\n{}\n\n",
        spaced(entries, |h| h.cipher),
        spaced(entries, |h| h.plain)
    );
    for entry in entries {
        out.push_str(&entry.mnemonic);
        out.push('\n');
    }
    out.push('\n');
    out
}

pub fn render_json(entries: &[Hint]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mnemonic::MnemonicOverrides;

    #[test]
    fn test_sorted_by_cipher_symbol() {
        let cipher = CipherMap::new("bcdefghijklmnopqrstuvwxyza").unwrap();
        let corpus = vec!["amiz".to_string()];
        let overrides = MnemonicOverrides::default();
        let resolver = MnemonicResolver::new(&corpus, &overrides);
        let entries = build(&cipher, &resolver);

        assert_eq!(entries.len(), 26);
        assert_eq!((entries[0].cipher, entries[0].plain), ('a', 'z'));
        assert_eq!(entries[0].mnemonic, "amiz");
        assert_eq!((entries[1].cipher, entries[1].plain), ('b', 'a'));
        assert_eq!(entries[1].mnemonic, "ba");

        let text = render_text(&entries);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("a b c d e f g h i j k l m n o p q r s t u v w x y z"));
        assert_eq!(lines.next(), Some("z a b c d e f g h i j k l m n o p q r s t u v w x y"));
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("amiz"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_text_layout_is_exact() {
        let entries = vec![
            Hint {
                plain: 'f',
                cipher: 't',
                mnemonic: "turf".to_string(),
            },
            Hint {
                plain: 'k',
                cipher: 'y',
                mnemonic: "yk".to_string(),
            },
        ];
        assert_eq!(render_text(&entries), "t y\nf k\n\nturf\nyk\n\n");
        assert_eq!(render_text(&[]), "\n\n\n\n");
    }

    #[test]
    fn test_json_rendering() {
        let entries = vec![Hint {
            plain: 'f',
            cipher: 't',
            mnemonic: "turf".to_string(),
        }];
        let json = render_json(&entries).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["plain"], "f");
        assert_eq!(value[0]["cipher"], "t");
        assert_eq!(value[0]["mnemonic"], "turf");
    }
}
