use super::value::{Value, Vars};

/// Variables visible to expressions, as a stack of frames.
///
/// The bottom frame holds the variables a template was rendered with. Each
/// repeat iteration pushes a frame for its loop bindings and pops it when the
/// iteration is done, so the enclosing bindings come back exactly as they were,
/// including names that did not exist before.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    frames: Vec<Vars>,
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope {
    pub fn new() -> Self {
        Self {
            frames: vec![Vars::new()],
        }
    }

    /// Innermost binding wins.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Binds `name` in the innermost frame.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.current_frame_mut().insert(name.into(), value)
    }

    pub fn push_frame(&mut self) {
        self.frames.push(Vars::new());
    }

    /// The bottom frame is never popped.
    pub fn pop_frame(&mut self) -> Option<Vars> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// All visible bindings, inner frames shadowing outer ones. Names keep the
    /// position of their first definition.
    pub fn flatten(&self) -> Vars {
        let mut vars = Vars::new();
        for frame in &self.frames {
            for (name, value) in frame {
                vars.insert(name.clone(), value.clone());
            }
        }
        vars
    }

    fn current_frame_mut(&mut self) -> &mut Vars {
        if self.frames.is_empty() {
            self.frames.push(Vars::new());
        }
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

impl From<Vars> for Scope {
    fn from(vars: Vars) -> Self {
        Self { frames: vec![vars] }
    }
}
