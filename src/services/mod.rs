pub mod explainer; // Chat model -> structured explanation
pub mod extractor; // Vision model -> report text
pub mod groq;
pub mod normalizer;

pub use explainer::ExplanationGenerator;
pub use extractor::ImageExtractor;
pub use groq::GroqClient;
