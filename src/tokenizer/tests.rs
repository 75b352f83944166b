use super::*;

#[test]
fn latin_runs_are_lowercased() {
    assert_eq!(tokenize("Git Push"), vec!["git", "push"]);
}

#[test]
fn digit_runs_are_single_tokens() {
    assert_eq!(tokenize("page 42 of 2024"), vec!["page", "42", "of", "2024"]);
}

#[test]
fn cjk_splits_per_ideograph() {
    assert_eq!(tokenize("同步仓库"), vec!["同", "步", "仓", "库"]);
}

#[test]
fn mixed_cjk_and_latin() {
    assert_eq!(
        tokenize("Git push 用于同步"),
        vec!["git", "push", "用", "于", "同", "步"]
    );
}

#[test]
fn punctuation_and_whitespace_are_discarded() {
    assert_eq!(tokenize("a,b。c！ --- !!!"), vec!["a", "b", "c"]);
    assert!(tokenize("。。。！？").is_empty());
}

#[test]
fn alphanumeric_boundaries_split_runs() {
    assert_eq!(tokenize("sha256sum"), vec!["sha", "256", "sum"]);
}

#[test]
fn tokenizing_twice_is_deterministic() {
    let text = "Git push 用于将本地更改同步到远程仓库。";
    assert_eq!(tokenize(text), tokenize(text));
}

#[test]
fn empty_input_yields_no_tokens() {
    assert!(tokenize("").is_empty());
    assert!(tokenize("   \n\t").is_empty());
}

#[test]
fn term_set_deduplicates() {
    let terms = term_set("git git 同 同 push");
    assert_eq!(terms.len(), 3);
    assert!(terms.contains("git"));
    assert!(terms.contains("同"));
    assert!(terms.contains("push"));
}
