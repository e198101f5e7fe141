use crate::quiz::Subject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topic {
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

const fn topic(
    name: &'static str,
    icon: &'static str,
    description: &'static str,
) -> Topic {
    Topic {
        name,
        icon,
        description,
    }
}

const MATH_TOPICS: [Topic; 6] = [
    topic("Fun Addition", "➕", "Add numbers together!"),
    topic("Super Subtraction", "➖", "Take away numbers!"),
    topic("Magic Multiplication", "✖️", "Multiply and grow!"),
    topic("Shapes & Geometry", "🔺", "Learn about shapes!"),
    topic("Money Math", "💰", "Count coins and bills!"),
    topic("Logic Puzzles", "🧩", "Train your brain!"),
];

const SCIENCE_TOPICS: [Topic; 6] = [
    topic("Amazing Animals", "🦁", "Learn about wildlife!"),
    topic("Space Explorers", "🚀", "Explore the stars!"),
    topic("Plant Power", "🌱", "How do plants grow?"),
    topic("Human Body", "🦴", "How your body works!"),
    topic("Wild Weather", "🌪️", "Rain, sun, and snow!"),
    topic("Fun Experiments", "🧪", "Science in action!"),
];

const ENGLISH_TOPICS: [Topic; 6] = [
    topic("Word Wizard", "📖", "Learn new words!"),
    topic("Grammar Guru", "✍️", "Fix the sentences!"),
    topic("Spelling Bee", "🐝", "Spell it right!"),
    topic("Reading Time", "📚", "Story adventures!"),
    topic("Rhyme Time", "🎵", "Match the sounds!"),
    topic("Storytelling", "🐉", "Create your own tale!"),
];

pub fn topics_for(subject: Subject) -> &'static [Topic] {
    match subject {
        Subject::Mathematics => &MATH_TOPICS,
        Subject::Science => &SCIENCE_TOPICS,
        Subject::English => &ENGLISH_TOPICS,
    }
}
