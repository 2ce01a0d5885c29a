/// Identifier of a shape in the store. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u64);

impl std::fmt::Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// One counter per store, starting at 1
#[derive(Debug, Clone)]
pub struct ShapeIdGenerator {
    next: u64,
}

impl Default for ShapeIdGenerator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl ShapeIdGenerator {
    pub fn generate_id(&mut self) -> ShapeId {
        let id = ShapeId(self.next);
        self.next += 1;
        id
    }
}
