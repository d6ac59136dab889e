//! Redundant load/store filter.
//!
//! A `lw` whose operands exactly match the `sw` directly before it
//! reloads a value that is still in the register (and vice versa for a
//! `sw` after an identical `lw`). This pass drops such lines; it never
//! reorders anything.

/// What the previous relevant line was.
enum Prev {
    None,
    Load(String),
    Store(String),
}

/// Filters redundant `lw`-after-`sw` / `sw`-after-`lw` pairs out of an
/// assembly listing. Lines are compared on their text after the
/// mnemonic, ignoring indentation.
///
/// # Examples
///
/// ```
/// use c0c_mips::filter_redundant_moves;
///
/// let lines = vec![
///     "sw\t$v0, 0($sp)".to_string(),
///     "lw\t$v0, 0($sp)".to_string(),
/// ];
/// let kept = filter_redundant_moves(&lines);
/// assert_eq!(kept, vec!["sw\t$v0, 0($sp)".to_string()]);
/// ```
pub fn filter_redundant_moves(lines: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    let mut prev = Prev::None;
    for line in lines {
        let trimmed = line.trim_start();
        let mut omit = false;
        if let Some(rest) = trimmed.strip_prefix("lw") {
            if matches!(&prev, Prev::Store(stored) if stored == rest) {
                omit = true;
            } else {
                prev = Prev::Load(rest.to_string());
            }
        } else if let Some(rest) = trimmed.strip_prefix("sw") {
            if matches!(&prev, Prev::Load(loaded) if loaded == rest) {
                omit = true;
            } else {
                prev = Prev::Store(rest.to_string());
            }
        } else {
            prev = Prev::None;
        }
        if !omit {
            out.push(line.clone());
        }
    }
    out
}

/// Convenience wrapper over a full listing.
pub fn filter_listing(asm: &str) -> String {
    let lines: Vec<String> = asm.lines().map(str::to_string).collect();
    let mut out = filter_redundant_moves(&lines).join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(input: &[&str]) -> Vec<String> {
        let lines: Vec<String> = input.iter().map(|s| s.to_string()).collect();
        filter_redundant_moves(&lines)
    }

    #[test]
    fn test_lw_after_identical_sw_dropped() {
        let kept = filter(&["sw\t$v0, 4($sp)", "lw\t$v0, 4($sp)"]);
        assert_eq!(kept, vec!["sw\t$v0, 4($sp)"]);
    }

    #[test]
    fn test_sw_after_identical_lw_dropped() {
        let kept = filter(&["lw\t$v0, x", "sw\t$v0, x"]);
        assert_eq!(kept, vec!["lw\t$v0, x"]);
    }

    #[test]
    fn test_different_register_kept() {
        let kept = filter(&["sw\t$v0, 4($sp)", "lw\t$v1, 4($sp)"]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_different_address_kept() {
        let kept = filter(&["sw\t$v0, 4($sp)", "lw\t$v0, 8($sp)"]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_intervening_line_blocks_elision() {
        let kept = filter(&["sw\t$v0, 4($sp)", "syscall", "lw\t$v0, 4($sp)"]);
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_indentation_ignored() {
        let kept = filter(&["        sw\t$v0, 4($sp)", "        lw\t$v0, 4($sp)"]);
        assert_eq!(kept, vec!["        sw\t$v0, 4($sp)"]);
    }

    #[test]
    fn test_repeated_redundant_loads_all_dropped() {
        // the surviving sw keeps suppressing identical loads
        let kept = filter(&[
            "sw\t$v0, 4($sp)",
            "lw\t$v0, 4($sp)",
            "lw\t$v0, 4($sp)",
        ]);
        assert_eq!(kept, vec!["sw\t$v0, 4($sp)"]);
    }

    #[test]
    fn test_order_preserved() {
        let kept = filter(&[
            "li\t$v0, 1",
            "sw\t$v0, 0($sp)",
            "li\t$v0, 2",
            "sw\t$v0, -4($sp)",
        ]);
        assert_eq!(kept.len(), 4);
    }

    #[test]
    fn test_filter_listing_roundtrip() {
        let asm = "main:\n        sw\t$v0, 0($sp)\n        lw\t$v0, 0($sp)\n";
        assert_eq!(filter_listing(asm), "main:\n        sw\t$v0, 0($sp)\n");
    }
}
