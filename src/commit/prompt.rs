//! Prompt construction for AI-generated commit messages.

use crate::git::StagedDiff;

/// Build the LLM prompt for a single-line commit message.
///
/// The diff is embedded verbatim.
pub fn build_commit_prompt(diff: &StagedDiff) -> String {
    format!(
        r#"You are generating a Git commit message following the Conventional Commits specification.

## Rules (STRICT)
- Respond with exactly ONE line: `type(scope): description`
- Type: one of feat, fix, build, chore, ci, docs, style, refactor, perf, test
- Scope is optional; infer it from the primary module affected
- Description: imperative mood ("add", "fix", "remove"), lowercase after colon, NO period at end
- The ENTIRE line must be at most 50 characters
- No body, no quotes, no markdown, no explanation

## Examples
feat(auth): add two-factor login
fix(parser): handle empty input
docs: update install steps

## Staged Diff
```diff
{diff}
```"#,
        diff = diff.as_str()
    )
}
