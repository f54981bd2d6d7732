use super::block::{Block, Clipboard};
use super::document::Document;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Type(u8),
    Enter,
    Backspace,
    Delete,
    DeleteLine,
    DeleteWord,
    SplitLine,
    Left,
    Right,
    Up,
    Down,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => prop::num::u8::ANY.prop_map(Op::Type),
        1 => Just(Op::Enter),
        1 => Just(Op::Backspace),
        1 => Just(Op::Delete),
        1 => Just(Op::DeleteLine),
        1 => Just(Op::DeleteWord),
        1 => Just(Op::SplitLine),
        1 => Just(Op::Left),
        1 => Just(Op::Right),
        1 => Just(Op::Up),
        1 => Just(Op::Down),
    ]
}

fn lines_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z ]{0,12}", 1..12)
}

fn apply(doc: &mut Document, op: &Op) {
    match op {
        Op::Type(b) => doc.insert_char(*b).unwrap(),
        Op::Enter => doc.new_line().unwrap(),
        Op::Backspace => doc.backspace().unwrap(),
        Op::Delete => doc.delete_char().unwrap(),
        Op::DeleteLine => doc.delete_line().unwrap(),
        Op::DeleteWord => doc.delete_word_right().unwrap(),
        Op::SplitLine => doc.split_line().unwrap(),
        Op::Left => {
            doc.move_left().unwrap();
        }
        Op::Right => {
            doc.move_right().unwrap();
        }
        Op::Up => {
            doc.move_up().unwrap();
        }
        Op::Down => {
            doc.move_down().unwrap();
        }
    }
}

fn from_strings(lines: &[String]) -> Document {
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    Document::from_text(&refs)
}

proptest! {
    #[test]
    fn document_stays_consistent(lines in lines_strategy(), ops in prop::collection::vec(op_strategy(), 0..80)) {
        let mut doc = from_strings(&lines);
        doc.format.right_margin = 20;
        for op in &ops {
            apply(&mut doc, op);
            prop_assert!(doc.line_count() >= 1);
            prop_assert_eq!(doc.line_count(), doc.lines().len());
            prop_assert!(doc.lines().check_links());
            prop_assert!(doc.lines().contains(doc.current_line_id()));
            prop_assert!(doc.cursor_x() <= doc.current_line().unwrap().len());
        }
    }

    #[test]
    fn insert_then_delete_is_identity(text in "[a-z ]{0,30}", at in 0usize..40, byte in 0x20u8..0x7f) {
        let mut doc = Document::from_text(&[text.as_str()]);
        doc.format.word_wrap = false;
        doc.set_cursor_x(at).unwrap();
        let x = doc.cursor_x();
        doc.insert_char(byte).unwrap();
        doc.set_cursor_x(x).unwrap();
        doc.delete_char().unwrap();
        prop_assert_eq!(doc.texts(), vec![text]);
    }

    #[test]
    fn typed_words_stay_inside_right_margin(words in prop::collection::vec("[a-z]{1,8}", 1..30)) {
        let mut doc = Document::new();
        doc.format.right_margin = 20;
        let text = words.join(" ");
        for b in text.bytes() {
            doc.insert_char(b).unwrap();
        }
        for line in doc.texts() {
            prop_assert!(line.len() <= 20, "{:?}", line);
        }
        let rejoined: Vec<String> = doc
            .texts()
            .iter()
            .flat_map(|l| l.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .collect();
        prop_assert_eq!(rejoined, words);
    }

    #[test]
    fn inserts_at_any_column_stay_inside_right_margin(
        lines in lines_strategy(),
        inserts in prop::collection::vec(
            (1usize..12, 0usize..30, prop_oneof![3 => b'a'..=b'z', 1 => Just(b' ')]),
            1..60,
        )
    ) {
        let mut doc = from_strings(&lines);
        doc.format.right_margin = 20;
        for (line, column, byte) in &inserts {
            doc.goto_line(&line.to_string()).unwrap();
            doc.set_cursor_x(*column).unwrap();
            doc.insert_char(*byte).unwrap();
            for text in doc.texts() {
                prop_assert!(
                    text.len() <= 20 || text.split_whitespace().count() <= 1,
                    "{:?}",
                    text
                );
            }
            prop_assert!(doc.cursor_x() <= doc.current_line().unwrap().len());
        }
    }

    #[test]
    fn block_copy_does_not_change_document(lines in lines_strategy(), a in 0usize..12, b in 0usize..12) {
        let mut doc = from_strings(&lines);
        let before = doc.texts();
        let mut block = Block::new();
        let mut clipboard = Clipboard::new();
        doc.goto_line(&(a + 1).to_string()).unwrap();
        block.mark_begin(&doc);
        doc.goto_line(&(b + 1).to_string()).unwrap();
        block.mark_end(&doc);

        let copied = block.copy(&doc, &mut clipboard).unwrap();
        prop_assert_eq!(doc.texts(), before);
        let (lo, hi) = (a.min(b).min(lines.len() - 1), a.max(b).min(lines.len() - 1));
        prop_assert_eq!(copied, hi - lo + 1);
    }

    #[test]
    fn block_delete_accounts_for_every_line(lines in lines_strategy(), a in 0usize..12, b in 0usize..12) {
        let mut doc = from_strings(&lines);
        let mut block = Block::new();
        doc.goto_line(&(a + 1).to_string()).unwrap();
        block.mark_begin(&doc);
        doc.goto_line(&(b + 1).to_string()).unwrap();
        block.mark_end(&doc);

        let before = doc.line_count();
        let removed = block.delete(&mut doc).unwrap();
        if removed == before {
            prop_assert_eq!(doc.line_count(), 1);
        } else {
            prop_assert_eq!(doc.line_count(), before - removed);
        }
        prop_assert!(doc.lines().check_links());
    }
}
