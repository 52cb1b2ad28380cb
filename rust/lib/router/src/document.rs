use std::sync::RwLock;

/// Page-level state the router is allowed to touch: the window title.
#[derive(Debug, Default)]
pub struct Document {
    title: RwLock<String>,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: RwLock::new(title.into()),
        }
    }

    pub fn title(&self) -> String {
        self.title.read().unwrap().clone()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        *self.title.write().unwrap() = title.into();
    }
}
