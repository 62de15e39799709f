//! Line reader: consumes an input message one character at a time.

use super::{Effects, Value};
use serde::Serialize;

lookup_table! {
    pub enum ReaderMethod {
        Read => "read",
    }
}

impl ReaderMethod {
    pub fn arity(self) -> usize {
        0
    }
}

lookup_table! {
    pub enum ReaderAttribute {
        CurrentChar => "current_char",
        Index => "index",
        Message => "message",
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Reader {
    message: String,
    current_char: String,
    index: usize,
}

impl Reader {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn call(&mut self, method: ReaderMethod, fx: &mut Effects<'_>) {
        match method {
            ReaderMethod::Read => {
                self.read(fx);
            }
        }
    }

    /// Accept the next character, emitting `char_accepted`, or emit
    /// `line_finished` once the message is exhausted.
    pub fn read(&mut self, fx: &mut Effects<'_>) -> bool {
        match self.message.chars().nth(self.index) {
            Some(c) => {
                self.current_char = c.to_string();
                self.index += 1;
                fx.emit("char_accepted");
                true
            }
            None => {
                fx.emit("line_finished");
                false
            }
        }
    }

    pub fn current_char(&self) -> &str {
        &self.current_char
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, attribute: ReaderAttribute) -> Value {
        match attribute {
            ReaderAttribute::CurrentChar => Value::from(self.current_char.as_str()),
            ReaderAttribute::Index => Value::Int(self.index as i64),
            ReaderAttribute::Message => Value::from(self.message.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EventQueue;

    #[test]
    fn reads_characters_then_finishes() {
        let mut queue = EventQueue::new();
        let mut reader = Reader::new("АБ");
        {
            let mut fx = Effects::new("reader", &mut queue, None);
            assert!(reader.read(&mut fx));
            assert_eq!(reader.current_char(), "А");
            assert!(reader.read(&mut fx));
            assert!(!reader.read(&mut fx));
        }

        assert_eq!(reader.index(), 2);
        assert_eq!(reader.get(ReaderAttribute::CurrentChar), Value::from("Б"));
        assert_eq!(
            queue.pending(),
            [
                "reader.char_accepted",
                "reader.char_accepted",
                "reader.line_finished"
            ]
        );
        assert!(queue.called().is_empty());
    }

    #[test]
    fn lookup_tables_resolve_names() {
        assert_eq!(ReaderMethod::lookup("read"), Some(ReaderMethod::Read));
        assert_eq!(ReaderMethod::lookup("write"), None);
        assert_eq!(
            ReaderAttribute::lookup("current_char"),
            Some(ReaderAttribute::CurrentChar)
        );
    }
}
