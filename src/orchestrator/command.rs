//! 交互命令解析
//!
//! 每行输入对应一个界面操作

use thiserror::Error;

use crate::services::CheckGroup;

/// 一次界面操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Show,
    Topics,
    Topic(String),
    Levels,
    Level(String),
    Previous,
    Next,
    /// 滑块位置（从 0 开始）
    Jump(usize),
    EditQuestion(String),
    EditAnswer(String),
    EditCitation(String),
    Check(CheckGroup, usize),
    Gradings,
    Grade(String),
    Shuffle,
    Preview,
    Submit,
    Quit,
}

/// 命令解析错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("空命令")]
    Empty,
    #[error("未知命令: {0}（输入 help 查看帮助）")]
    Unknown(String),
    #[error("命令 {command} 缺少参数: {expected}")]
    MissingArgument {
        command: String,
        expected: &'static str,
    },
    #[error("参数无效: {0}")]
    InvalidArgument(String),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Empty);
        }
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let require = |expected: &'static str| -> Result<String, ParseError> {
            if rest.is_empty() {
                Err(ParseError::MissingArgument {
                    command: name.to_string(),
                    expected,
                })
            } else {
                Ok(rest.to_string())
            }
        };

        let command = match name {
            "help" | "h" | "?" => Command::Help,
            "show" | "s" => Command::Show,
            "topics" => Command::Topics,
            "topic" => Command::Topic(require("主题名称")?),
            "levels" => Command::Levels,
            "level" => Command::Level(require("难度名称")?),
            "prev" | "p" => Command::Previous,
            "next" | "n" => Command::Next,
            "jump" | "j" => {
                let arg = require("位置")?;
                let position = arg
                    .parse()
                    .map_err(|_| ParseError::InvalidArgument(arg.clone()))?;
                Command::Jump(position)
            }
            "q" => Command::EditQuestion(require("问题文本")?),
            "a" => Command::EditAnswer(require("答案文本")?),
            "c" => Command::EditCitation(require("引用文本")?),
            "check" | "x" => {
                let arg = require("分组 编号")?;
                let (group, number) = arg
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| ParseError::InvalidArgument(arg.clone()))?;
                let group = CheckGroup::parse(group)
                    .ok_or_else(|| ParseError::InvalidArgument(group.to_string()))?;
                let number = number
                    .trim()
                    .parse()
                    .map_err(|_| ParseError::InvalidArgument(number.to_string()))?;
                Command::Check(group, number)
            }
            "gradings" => Command::Gradings,
            "grade" | "g" => Command::Grade(require("评分类别")?),
            "shuffle" => Command::Shuffle,
            "preview" => Command::Preview,
            "submit" => Command::Submit,
            "quit" | "exit" => Command::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

/// 帮助文本
pub const HELP: &str = "\
命令:
  show | s                 显示当前题目
  topics / topic <名称>    列出 / 选择主题
  levels / level <名称>    列出 / 选择难度（评分模式）
  prev | p, next | n       上一题 / 下一题（首尾循环）
  jump | j <位置>          跳到筛选结果中的位置（从 0 开始）
  q / a / c <文本>         修改问题 / 答案 / 引用
  check | x <q|a|c|f> <n>  切换评审项（f 为轻微修改的修改项）
  gradings / grade <n>     列出 / 选择评分类别
  shuffle                  重新抽取文档（分析模式）
  preview                  预览提交记录
  submit                   提交
  quit                     退出";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navigation_and_edits() {
        assert_eq!(Command::parse("n"), Ok(Command::Next));
        assert_eq!(Command::parse("  prev "), Ok(Command::Previous));
        assert_eq!(Command::parse("jump 3"), Ok(Command::Jump(3)));
        assert_eq!(
            Command::parse("q Thuế là gì, theo luật?"),
            Ok(Command::EditQuestion("Thuế là gì, theo luật?".to_string()))
        );
        assert_eq!(
            Command::parse("topic Thuế và phí"),
            Ok(Command::Topic("Thuế và phí".to_string()))
        );
    }

    #[test]
    fn test_parse_check() {
        assert_eq!(
            Command::parse("check f 2"),
            Ok(Command::Check(CheckGroup::Fix, 2))
        );
        assert!(matches!(
            Command::parse("check z 2"),
            Err(ParseError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Command::parse("   "), Err(ParseError::Empty));
        assert!(matches!(Command::parse("jump"), Err(ParseError::MissingArgument { .. })));
        assert!(matches!(Command::parse("jump x"), Err(ParseError::InvalidArgument(_))));
        assert!(matches!(Command::parse("fly"), Err(ParseError::Unknown(_))));
    }
}
