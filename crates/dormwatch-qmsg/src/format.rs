// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Markdown flattening for plain-text QQ messages.

/// Separator line between the title and the body.
pub const TITLE_RULE: &str = "--------------------";

/// Markup removed in order. The generic heading marker comes after the
/// emoji headings so those lose their icon too.
const STRIPPED: &[&str] = &["**", "## ℹ️ ", "## ❌ ", "## ", "> "];

/// Renders a markdown message as plain text prefixed with its title.
pub fn flatten_markdown(title: &str, body: &str) -> String {
    let mut text = body.to_string();
    for marker in STRIPPED {
        text = text.replace(marker, "");
    }
    text = text.replace("\n\n---\n\n", "\n");
    format!("{title}\n{TITLE_RULE}\n{text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_emphasis_and_headings() {
        let flat = flatten_markdown(
            "晚点名：2 人情况汇总",
            "**全班今日28人在校**，张三 未打卡，李四 不在校\n\n",
        );
        assert_eq!(
            flat,
            "晚点名：2 人情况汇总\n--------------------\n全班今日28人在校，张三 未打卡，李四 不在校\n\n"
        );
    }

    #[test]
    fn removes_emoji_heading_prefixes() {
        let flat = flatten_markdown(
            "考勤脚本执行异常",
            "## ❌ 脚本执行异常\n\n**错误详情**: `timeout`\n",
        );
        assert_eq!(
            flat,
            "考勤脚本执行异常\n--------------------\n脚本执行异常\n\n错误详情: `timeout`\n"
        );
        assert_eq!(
            flatten_markdown("t", "## ℹ️ 提示"),
            "t\n--------------------\n提示"
        );
    }

    #[test]
    fn collapses_rules_and_quotes() {
        let flat = flatten_markdown("t", "> 第一段\n\n---\n\n第二段");
        assert_eq!(flat, "t\n--------------------\n第一段\n第二段");
    }
}
