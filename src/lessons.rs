/// One instructional card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub title: &'static str,
    pub description: &'static str,
}

pub const STEPS: [Step; 5] = [
    Step {
        title: "Step 1: Check for Response",
        description: "Tap the person's shoulder and shout 'Are you OK?' to make sure they need help.",
    },
    Step {
        title: "Step 2: Call for Help",
        description: "You or someone else should call emergency services (like 911) immediately.",
    },
    Step {
        title: "Step 3: Hand Position",
        description: "Place the heel of one hand on the center of the chest, then place the other hand on top.",
    },
    Step {
        title: "Step 4: Chest Compressions",
        description: "Push hard and fast, about 2 inches deep. Aim for a rhythm of 100-120 beats per minute.",
    },
    Step {
        title: "Step 5: Keep the Rhythm!",
        description: "A song like 'Stayin' Alive' has the perfect tempo. Keep going until help arrives.",
    },
];

/// Cursor over the steps, clamped at both ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lesson {
    current: usize,
}

impl Lesson {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn step(&self) -> &'static Step {
        &STEPS[self.current]
    }

    pub fn next(&mut self) {
        self.current = (self.current + 1).min(STEPS.len() - 1);
    }

    pub fn prev(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    pub fn has_prev(&self) -> bool {
        self.current > 0
    }

    pub fn has_next(&self) -> bool {
        self.current < STEPS.len() - 1
    }

    /// "Step N of M"
    pub fn position(&self) -> String {
        format!("Step {} of {}", self.current + 1, STEPS.len())
    }

    /// Whether this step pictures the rescuer mid-compression
    pub fn shows_compression(&self) -> bool {
        self.current == 3
    }
}
