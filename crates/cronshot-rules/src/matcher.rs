//! 창 제목 규칙 매칭.
//!
//! 2단계 매칭: 정확 일치 패스 → 정규식 패스.
//! 정확 일치는 목록 순서와 관계없이 항상 정규식보다 우선한다.

use cronshot_core::models::rule::Rule;
use regex::Regex;
use tracing::debug;

/// 틱 단위 규칙 매처
///
/// 활성 규칙의 정규식을 한 번만 컴파일해 두고 여러 창 제목에 재사용한다.
/// 컴파일 실패한 패턴은 정규식 패스에서 매칭되지 않는 것으로 취급한다.
pub struct RuleMatcher<'a> {
    entries: Vec<(&'a Rule, Option<Regex>)>,
}

impl<'a> RuleMatcher<'a> {
    /// 규칙 목록으로 매처 생성 (비활성 규칙 제외)
    pub fn new(rules: &'a [Rule]) -> Self {
        let entries = rules
            .iter()
            .filter(|rule| rule.enabled)
            .map(|rule| (rule, compile_pattern(&rule.pattern)))
            .collect();
        Self { entries }
    }

    /// 창 제목에 적용할 규칙 검색
    pub fn find(&self, title: &str) -> Option<&'a Rule> {
        // 1차: 정확 일치
        if let Some((rule, _)) = self.entries.iter().find(|(rule, _)| rule.pattern == title) {
            return Some(*rule);
        }

        // 2차: 정규식 (부분 일치)
        self.entries
            .iter()
            .find(|(_, re)| re.as_ref().is_some_and(|re| re.is_match(title)))
            .map(|(rule, _)| *rule)
    }

    /// 활성 규칙 수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 창 제목에 적용할 규칙 검색 (단발 호출용)
pub fn match_rule<'a>(title: &str, rules: &'a [Rule]) -> Option<&'a Rule> {
    RuleMatcher::new(rules).find(title)
}

fn compile_pattern(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            debug!("규칙 패턴 컴파일 실패, 정규식 매칭 제외: {pattern:?} ({e})");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_beats_earlier_regex() {
        let rules = vec![Rule::new(".*"), Rule::new("Foo")];
        let rule = match_rule("Foo", &rules).unwrap();
        assert_eq!(rule.pattern, "Foo");
    }

    #[test]
    fn disabled_rule_never_matches() {
        let rules = vec![Rule::new("Foo").with_enabled(false)];
        assert!(match_rule("Foo", &rules).is_none());
    }

    #[test]
    fn disabled_rule_is_skipped_in_regex_pass() {
        let rules = vec![
            Rule::new("Fo+").with_enabled(false).with_fixed_folder("off"),
            Rule::new("o{2}").with_fixed_folder("on"),
        ];
        let rule = match_rule("Foo bar", &rules).unwrap();
        assert_eq!(rule.fixed_folder, "on");
    }

    #[test]
    fn regex_is_search_anywhere() {
        let rules = vec![Rule::new(r"Visual Studio Code$")];
        assert!(match_rule("main.rs - cronshot - Visual Studio Code", &rules).is_some());
        assert!(match_rule("Visual Studio Code Insiders", &rules).is_none());
    }

    #[test]
    fn first_regex_in_order_wins() {
        let rules = vec![
            Rule::new("Chrome").with_fixed_folder("first"),
            Rule::new("Google").with_fixed_folder("second"),
        ];
        let rule = match_rule("Google - Chrome", &rules).unwrap();
        assert_eq!(rule.fixed_folder, "first");
    }

    #[test]
    fn invalid_regex_is_silently_skipped() {
        let rules = vec![Rule::new("(unclosed"), Rule::new("closed")];
        let rule = match_rule("(unclosed) closed", &rules).unwrap();
        assert_eq!(rule.pattern, "closed");
    }

    #[test]
    fn invalid_regex_still_matches_exactly() {
        let rules = vec![Rule::new("[draft")];
        assert!(match_rule("[draft", &rules).is_some());
    }

    #[test]
    fn no_rules_no_match() {
        assert!(match_rule("anything", &[]).is_none());
    }

    #[test]
    fn matcher_reused_across_titles() {
        let rules = vec![Rule::new(r"^Report \d+$"), Rule::new("Inbox")];
        let matcher = RuleMatcher::new(&rules);
        assert_eq!(matcher.len(), 2);
        assert_eq!(matcher.find("Report 7").unwrap().pattern, r"^Report \d+$");
        assert_eq!(matcher.find("Inbox (3)").unwrap().pattern, "Inbox");
        assert!(matcher.find("Calendar").is_none());
    }
}
