//! Prompt construction. Each technique frames the student's message
//! differently before it goes to the model; the message itself is embedded
//! verbatim.

pub const DEFAULT_TECHNIQUE: &str = "zero-shot";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Technique {
    ZeroShot,
    FewShot,
    ChainOfThought,
    /// Anything we don't recognise gets a one-line instruction.
    Generic,
}

impl Technique {
    pub fn from_name(name: &str) -> Self {
        match name {
            "zero-shot" => Self::ZeroShot,
            "few-shot" => Self::FewShot,
            "chain-of-thought" => Self::ChainOfThought,
            _ => Self::Generic,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ZeroShot => "zero-shot",
            Self::FewShot => "few-shot",
            Self::ChainOfThought => "chain-of-thought",
            Self::Generic => "generic",
        }
    }

    pub fn render(self, message: &str) -> String {
        match self {
            Self::ZeroShot => format!(
                "You are a helpful study buddy. Help the student learn about: {message}\n\
                 \n\
                 Please provide a clear, educational explanation that is:\n\
                 - Easy to understand\n\
                 - Accurate and informative\n\
                 - Encouraging and supportive\n\
                 \n\
                 Topic: {message}"
            ),
            Self::FewShot => format!(
                "You are a helpful study buddy. Here are examples of how I help students:\n\
                 \n\
                 {FEW_SHOT_EXAMPLES}\n\
                 \n\
                 Now help this student:\n\
                 Student: \"{message}\"\n\
                 Study Buddy:"
            ),
            Self::ChainOfThought => format!(
                "You are a helpful study buddy. When explaining complex topics, break them down step-by-step with clear reasoning.\n\
                 \n\
                 For the topic \"{message}\", please:\n\
                 1. First, identify the key components or concepts involved\n\
                 2. Explain each component step by step\n\
                 3. Show how they connect or work together\n\
                 4. Provide a clear conclusion or summary\n\
                 5. Use phrases like \"Let's think through this step by step\" and \"Here's why this happens\"\n\
                 \n\
                 Topic to explain: {message}"
            ),
            Self::Generic => format!("Help the student learn about: {message}"),
        }
    }
}

const FEW_SHOT_EXAMPLES: &str = "Example 1:\n\
Student: \"Explain gravity\"\n\
Study Buddy: \"Gravity is the force that attracts objects toward each other. Think of it like an invisible rope pulling things together. On Earth, gravity pulls everything toward the center, which is why things fall down instead of floating away. The more massive an object is, the stronger its gravitational pull. That's why the Moon orbits Earth, and Earth orbits the Sun!\"\n\
\n\
Example 2:\n\
Student: \"What is photosynthesis?\"\n\
Study Buddy: \"Photosynthesis is how plants make their own food using sunlight! Here's the simple version: Plants take in carbon dioxide from the air and water from their roots, then use sunlight as energy to combine them into sugar (glucose) and oxygen. The equation is: 6CO₂ + 6H₂O + light energy → C₆H₁₂O₆ + 6O₂. Think of plants as little solar-powered food factories!\"";

pub fn build_prompt(message: &str, technique: &str) -> String {
    Technique::from_name(technique).render(message)
}
