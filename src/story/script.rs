use crate::store::Scene;

/// What moves the narrative past a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryTrigger {
    /// Shown on entry.
    None,
    /// Bloom progress moves past it.
    Bloom,
    /// Reading the letter moves past it.
    LetterOpen,
    /// Follows on its own.
    Auto,
    /// Reaching this line focuses the chocolate and plays a cue.
    Chocolate,
}

/// Screen anchor of a caption card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionLayout {
    /// Centered along the top edge.
    TopCenter,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Middle of the screen.
    Center,
    /// Centered along the bottom edge.
    BottomCenter,
}

/// Typographic weight of a caption card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// Small italics.
    Whisper,
    /// Regular body size.
    Normal,
    /// Large.
    Grand,
    /// Largest.
    Dramatic,
}

/// One line of the narrative script.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoryLine {
    /// Stable key.
    pub id: &'static str,
    /// Main caption.
    pub text: &'static str,
    /// Smaller line under the caption; may be empty.
    pub subtext: &'static str,
    /// What moves past this line.
    pub trigger: StoryTrigger,
    /// Caption anchor.
    pub layout: CaptionLayout,
    /// Caption weight.
    pub emphasis: Emphasis,
    /// Seconds on screen; `None` keeps the caption up.
    pub duration: Option<f32>,
    /// Scene the line belongs to.
    pub scene: Scene,
}

/// The fixed script, indexed by story step.
pub const STORY_LINES: [StoryLine; 6] = [
    StoryLine {
        id: "opening",
        text: "There is a small gift...",
        subtext: "made just for the one I love",
        trigger: StoryTrigger::None,
        layout: CaptionLayout::TopCenter,
        emphasis: Emphasis::Whisper,
        duration: Some(5.0),
        scene: Scene::Intro,
    },
    StoryLine {
        id: "blooming",
        text: "Every petal...",
        subtext: "is a heartbeat of mine for you",
        trigger: StoryTrigger::Bloom,
        layout: CaptionLayout::TopLeft,
        emphasis: Emphasis::Whisper,
        duration: Some(6.0),
        scene: Scene::Flower,
    },
    StoryLine {
        id: "letter_reveal",
        text: "There is something I want to say...",
        subtext: "written in this letter",
        trigger: StoryTrigger::LetterOpen,
        layout: CaptionLayout::TopRight,
        emphasis: Emphasis::Normal,
        duration: Some(5.0),
        scene: Scene::Flower,
    },
    StoryLine {
        id: "after_letter",
        text: "And one more sweet thing...",
        subtext: "I want to give you",
        trigger: StoryTrigger::Auto,
        layout: CaptionLayout::Center,
        emphasis: Emphasis::Normal,
        duration: Some(4.0),
        scene: Scene::Climax,
    },
    StoryLine {
        id: "chocolate_love",
        text: "Sweet as our love...",
        subtext: "every chocolate is a promise",
        trigger: StoryTrigger::Chocolate,
        layout: CaptionLayout::BottomCenter,
        emphasis: Emphasis::Grand,
        duration: Some(6.0),
        scene: Scene::Chocolate,
    },
    StoryLine {
        id: "finale",
        text: "Happy Valentine's Day!",
        subtext: "Thank you for being part of my life",
        trigger: StoryTrigger::Auto,
        layout: CaptionLayout::Center,
        emphasis: Emphasis::Dramatic,
        duration: None,
        scene: Scene::Ending,
    },
];

/// Index of the first line belonging to `scene`, or `0` when none does.
pub fn first_step_of(scene: Scene) -> usize {
    STORY_LINES
        .iter()
        .position(|line| line.scene == scene)
        .unwrap_or(0)
}
