mod indirect_lighting;

pub use self::indirect_lighting::*;
