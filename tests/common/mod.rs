//! Scripted in-memory connection for driving models without a database

#![allow(dead_code)]

use minorm::{Connection, DatastoreError, Fields, ModelDescriptor, Model, OrmResult, Row, RowIter};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Execute,
    RowCount,
    Get,
    Query,
    Iter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub mode: Mode,
    pub sql: String,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone)]
pub enum Reply {
    Id(u64),
    Count(u64),
    Row(Option<Row>),
    Rows(Vec<Row>),
    Fail(DatastoreError),
}

/// Records every call and answers from a queue; an empty queue answers
/// 0, `None` or no rows
#[derive(Debug, Default)]
pub struct MockConnection {
    calls: Mutex<Vec<Call>>,
    replies: Mutex<VecDeque<Reply>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, reply: Reply) -> &Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Call {
        self.calls().last().cloned().expect("no calls recorded")
    }

    fn answer(&self, mode: Mode, sql: &str, values: &[Value]) -> Option<Reply> {
        self.calls.lock().unwrap().push(Call {
            mode,
            sql: sql.to_string(),
            values: values.to_vec(),
        });
        self.replies.lock().unwrap().pop_front()
    }
}

fn unexpected(reply: Reply, mode: Mode) -> ! {
    panic!("reply {:?} does not fit a {:?} call", reply, mode)
}

impl Connection for MockConnection {
    fn execute(&self, sql: &str, values: &[Value]) -> OrmResult<u64> {
        match self.answer(Mode::Execute, sql, values) {
            None => Ok(0),
            Some(Reply::Id(id)) => Ok(id),
            Some(Reply::Fail(e)) => Err(e.into()),
            Some(other) => unexpected(other, Mode::Execute),
        }
    }

    fn execute_rowcount(&self, sql: &str, values: &[Value]) -> OrmResult<u64> {
        match self.answer(Mode::RowCount, sql, values) {
            None => Ok(0),
            Some(Reply::Count(n)) => Ok(n),
            Some(Reply::Fail(e)) => Err(e.into()),
            Some(other) => unexpected(other, Mode::RowCount),
        }
    }

    fn get(&self, sql: &str, values: &[Value]) -> OrmResult<Option<Row>> {
        match self.answer(Mode::Get, sql, values) {
            None => Ok(None),
            Some(Reply::Row(row)) => Ok(row),
            Some(Reply::Fail(e)) => Err(e.into()),
            Some(other) => unexpected(other, Mode::Get),
        }
    }

    fn query(&self, sql: &str, values: &[Value]) -> OrmResult<Vec<Row>> {
        match self.answer(Mode::Query, sql, values) {
            None => Ok(Vec::new()),
            Some(Reply::Rows(rows)) => Ok(rows),
            Some(Reply::Fail(e)) => Err(e.into()),
            Some(other) => unexpected(other, Mode::Query),
        }
    }

    fn iter<'a>(&'a self, sql: &str, values: &[Value]) -> OrmResult<RowIter<'a>> {
        match self.answer(Mode::Iter, sql, values) {
            None => Ok(Box::new(std::iter::empty())),
            Some(Reply::Rows(rows)) => Ok(Box::new(rows.into_iter().map(Ok))),
            Some(Reply::Fail(e)) => Err(e.into()),
            Some(other) => unexpected(other, Mode::Iter),
        }
    }
}

pub const COLUMNS: [&str; 4] = ["id", "name", "content", "type"];

pub fn test_model() -> (Model<MockConnection>, Arc<MockConnection>) {
    let conn = Arc::new(MockConnection::new());
    let descriptor = ModelDescriptor::new("test_orm", COLUMNS).unwrap();
    (Model::new(descriptor, Arc::clone(&conn)), conn)
}

pub fn row(id: u64, name: &str, kind: i64) -> Fields {
    minorm::fields! { "id" => id, "name" => name, "content" => "", "type" => kind }
}
