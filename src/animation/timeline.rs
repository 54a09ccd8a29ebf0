use super::{Property, PropertyTarget, TweenDefaults, Value};

/// Where a step is placed on the timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Position {
    /// Start at the current end of the timeline.
    #[default]
    Sequential,
    /// Start this many seconds after the current end (negative overlaps).
    Offset(f32),
    /// Start at an absolute time in seconds.
    At(f32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StepState {
    Pending,
    Running,
    Done,
    /// The target did not exist when the timeline started.
    Skipped,
}

#[derive(Clone, Debug)]
struct Step {
    property: Property,
    from: Value,
    to: Value,
    start: f32,
    duration: f32,
    state: StepState,
}

impl Step {
    fn end(&self) -> f32 {
        self.start + self.duration
    }
}

/// A one-shot sequence of from/to property animations.
///
/// Steps are laid out at build time: each starts at the end of the timeline
/// so far unless given a [`Position`]. When the timeline starts, every step renders
/// its from-value immediately, so properties sit at their initial values until
/// their step begins. Steps whose target is missing are skipped but keep
/// their slot, so later steps start at the same time either way.
///
/// # Example
/// ```ignore
/// let mut timeline = Timeline::new(TweenDefaults { duration: 1.0, ..Default::default() });
/// timeline
///     .from_to(Property::SphereScale, Value::Vec3(Vec3::ZERO), Value::Vec3(Vec3::ONE))
///     .from_to(Property::NavOffset, Value::Scalar(-1.0), Value::Scalar(0.0));
/// timeline.start(&mut scene);
///
/// // Each frame:
/// timeline.tick(dt, &mut scene);
/// ```
#[derive(Clone, Debug)]
pub struct Timeline {
    steps: Vec<Step>,
    defaults: TweenDefaults,
    time: f32,
    started: bool,
}

impl Timeline {
    pub fn new(defaults: TweenDefaults) -> Self {
        Self {
            steps: Vec::new(),
            defaults,
            time: 0.0,
            started: false,
        }
    }

    /// Append a step using the default duration, right after the previous one.
    pub fn from_to(&mut self, property: Property, from: Value, to: Value) -> &mut Self {
        self.from_to_at(property, from, to, None, Position::Sequential)
    }

    /// Append a step with an explicit duration and/or position.
    pub fn from_to_at(
        &mut self,
        property: Property,
        from: Value,
        to: Value,
        duration: Option<f32>,
        position: Position,
    ) -> &mut Self {
        let duration = duration.unwrap_or(self.defaults.duration).max(0.0);
        let end = self.duration();
        let start = match position {
            Position::Sequential => end,
            Position::Offset(offset) => (end + offset).max(0.0),
            Position::At(at) => at.max(0.0),
        };
        let step = Step {
            property,
            from,
            to,
            start,
            duration,
            state: StepState::Pending,
        };
        self.steps.push(step);
        self
    }

    /// Start times of every step, in declaration order.
    pub fn step_starts(&self) -> Vec<f32> {
        self.steps.iter().map(|step| step.start).collect()
    }

    /// Total length in seconds.
    pub fn duration(&self) -> f32 {
        self.steps.iter().map(Step::end).fold(0.0, f32::max)
    }

    /// Seconds since the timeline started.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_finished(&self) -> bool {
        self.started
            && self
                .steps
                .iter()
                .all(|step| matches!(step.state, StepState::Done | StepState::Skipped))
    }

    /// Start playback: resolve targets and render every from-value.
    pub fn start(&mut self, target: &mut impl PropertyTarget) {
        self.time = 0.0;
        self.started = true;
        for step in &mut self.steps {
            if target.get(step.property).is_some() {
                step.state = StepState::Pending;
                target.set(step.property, step.from);
            } else {
                tracing::warn!(property = ?step.property, "timeline target not found, step skipped");
                step.state = StepState::Skipped;
            }
        }
        tracing::debug!(steps = self.steps.len(), duration = self.duration(), "timeline started");
        self.tick(0.0, target);
    }

    /// Advance by `dt` seconds and write the values of running steps.
    pub fn tick(&mut self, dt: f32, target: &mut impl PropertyTarget) {
        if !self.started || self.is_finished() {
            return;
        }
        self.time += dt;

        let easing = self.defaults.easing;
        for step in &mut self.steps {
            if matches!(step.state, StepState::Done | StepState::Skipped) || self.time < step.start
            {
                continue;
            }
            if step.state == StepState::Pending {
                tracing::debug!(property = ?step.property, start = step.start, "timeline step running");
                step.state = StepState::Running;
            }

            let progress = if step.duration > 0.0 {
                ((self.time - step.start) / step.duration).min(1.0)
            } else {
                1.0
            };
            target.set(step.property, step.from.lerp(step.to, easing.apply(progress)));
            if progress >= 1.0 {
                step.state = StepState::Done;
            }
        }

        if self.is_finished() {
            tracing::debug!(time = self.time, "timeline finished");
        }
    }
}
