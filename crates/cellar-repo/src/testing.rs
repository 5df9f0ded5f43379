//! Fixture domain types shared by the unit tests.

use std::sync::Arc;

use cellar_store::{DomainObject, SharedObject};
use cellar_types::{ClassId, DurableId, SessionHandle};

use crate::class::ObjectClass;

#[derive(Debug, PartialEq)]
pub struct Note {
    pub id: DurableId,
    pub handle: SessionHandle,
    pub text: String,
}

impl DomainObject for Note {
    fn durable_id(&self) -> DurableId {
        self.id
    }
    fn handle(&self) -> SessionHandle {
        self.handle
    }
    fn class_id(&self) -> ClassId {
        Self::CLASS_ID
    }
}

impl ObjectClass for Note {
    const CLASS_ID: ClassId = ClassId::new(5);
    const CLASS_NAME: &'static str = "Note";
}

#[derive(Debug, PartialEq)]
pub struct Person {
    pub id: DurableId,
    pub handle: SessionHandle,
    pub name: String,
}

impl DomainObject for Person {
    fn durable_id(&self) -> DurableId {
        self.id
    }
    fn handle(&self) -> SessionHandle {
        self.handle
    }
    fn class_id(&self) -> ClassId {
        Self::CLASS_ID
    }
}

impl ObjectClass for Person {
    const CLASS_ID: ClassId = ClassId::new(7);
    const CLASS_NAME: &'static str = "Person";
}

/// Claims Note's class tag without being a `Note`.
#[derive(Debug)]
pub struct Impostor {
    id: DurableId,
    handle: SessionHandle,
}

impl DomainObject for Impostor {
    fn durable_id(&self) -> DurableId {
        self.id
    }
    fn handle(&self) -> SessionHandle {
        self.handle
    }
    fn class_id(&self) -> ClassId {
        Note::CLASS_ID
    }
}

pub fn id(n: u8) -> DurableId {
    DurableId::from_bytes([n; 16])
}

pub fn handle(n: u32) -> SessionHandle {
    SessionHandle::new(n).unwrap()
}

pub fn note(n: u8, h: u32, text: &str) -> SharedObject {
    Arc::new(Note {
        id: id(n),
        handle: handle(h),
        text: text.to_string(),
    })
}

pub fn person(n: u8, h: u32, name: &str) -> SharedObject {
    Arc::new(Person {
        id: id(n),
        handle: handle(h),
        name: name.to_string(),
    })
}

pub fn impostor(n: u8, h: u32) -> SharedObject {
    Arc::new(Impostor {
        id: id(n),
        handle: handle(h),
    })
}
