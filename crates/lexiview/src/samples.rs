// Built-in sample texts offered by each analysis tab's sample picker.

use crate::protocol::TabId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub id: &'static str,
    pub title: &'static str,
    pub text: &'static str,
}

const fn sample(id: &'static str, title: &'static str, text: &'static str) -> Sample {
    Sample { id, title, text }
}

pub const POS_SAMPLES: &[Sample] = &[
    sample(
        "simple",
        "Simple Sentence",
        "The quick brown fox jumps over the lazy dog.",
    ),
    sample(
        "complex",
        "Complex Sentence",
        "Although it was raining heavily, the dedicated students continued their research in the university library, analyzing various linguistic patterns and grammatical structures.",
    ),
    sample(
        "business",
        "Business Text",
        "Our company plans to launch a revolutionary new product next quarter, which will significantly improve customer satisfaction and increase our market share.",
    ),
    sample(
        "academic",
        "Academic Text",
        "The researchers conducted a comprehensive study examining the correlation between social media usage and mental health outcomes among college students.",
    ),
    sample(
        "news",
        "News Article",
        "The government announced new policies yesterday that will affect millions of citizens, including changes to healthcare regulations and tax reforms.",
    ),
];

pub const NER_SAMPLES: &[Sample] = &[
    sample(
        "simple_entities",
        "Simple Entities",
        "Apple Inc. was founded by Steve Jobs in California on April 1, 1976.",
    ),
    sample(
        "complex_entities",
        "Complex Entities",
        "Microsoft Corporation, headquartered in Redmond, Washington, announced a $50 billion acquisition of Activision Blizzard on January 18, 2022.",
    ),
    sample(
        "news_entities",
        "News Entities",
        "The United Nations Security Council met in New York yesterday to discuss the ongoing conflict in Ukraine, with representatives from Russia, China, and the United States attending.",
    ),
    sample(
        "financial_entities",
        "Financial Text",
        "Tesla Inc. reported a 25% increase in revenue to $81.5 billion in 2022, with CEO Elon Musk announcing plans to expand operations in Europe and Asia.",
    ),
    sample(
        "historical_entities",
        "Historical Text",
        "World War II ended on September 2, 1945, when Japan formally surrendered aboard the USS Missouri in Tokyo Bay, marking the conclusion of the deadliest conflict in human history.",
    ),
];

pub const TRANSLATION_SAMPLES: &[Sample] = &[
    sample("greeting", "Greeting", "Hello, how are you today?"),
    sample(
        "business_meeting",
        "Business Meeting",
        "We need to schedule a meeting to discuss the quarterly results and plan our strategy for the next fiscal year.",
    ),
    sample(
        "travel",
        "Travel",
        "I would like to book a flight from New York to Paris for next week, preferably in business class.",
    ),
    sample(
        "food",
        "Food",
        "This restaurant serves the most delicious pasta I have ever tasted, with fresh ingredients and authentic Italian recipes.",
    ),
    sample(
        "technology",
        "Technology",
        "Artificial intelligence and machine learning are revolutionizing the way we process data and make decisions in modern businesses.",
    ),
];

pub const DEPENDENCY_SAMPLES: &[Sample] = &[
    sample("svo", "Subject-Verb-Object", "The cat chased the mouse."),
    sample(
        "prepositional",
        "Prepositional Phrase",
        "She put the book on the shelf near the window.",
    ),
    sample(
        "relative_clause",
        "Relative Clause",
        "The student who won the award thanked her teachers.",
    ),
    sample(
        "coordination",
        "Coordination",
        "John and Mary bought apples and oranges at the market.",
    ),
    sample(
        "passive",
        "Passive Voice",
        "The letter was written by the committee last week.",
    ),
];

pub const CFG_SAMPLES: &[Sample] = &[
    sample("short", "Short Sentence", "The dog barked."),
    sample(
        "adjectives",
        "Adjective Phrase",
        "A small child saw the big red balloon.",
    ),
    sample(
        "ambiguous",
        "Attachment Ambiguity",
        "I saw the man with the telescope.",
    ),
    sample(
        "ditransitive",
        "Ditransitive Verb",
        "The teacher gave the students a difficult exam.",
    ),
    sample(
        "embedded",
        "Embedded Clause",
        "She believes that the plan will succeed.",
    ),
];

pub const SEMANTIC_SAMPLES: &[Sample] = &[
    sample("giving", "Giving Event", "John gave Mary a book yesterday."),
    sample(
        "instrument",
        "Instrument",
        "The chef cut the bread with a sharp knife.",
    ),
    sample(
        "location",
        "Location and Time",
        "The children played football in the park after school.",
    ),
    sample(
        "causation",
        "Causation",
        "The storm destroyed several houses along the coast.",
    ),
    sample(
        "communication",
        "Communication",
        "The manager told the team that the deadline had moved.",
    ),
];

/// Samples offered on `tab`. The languages tab has none.
pub fn samples_for(tab: TabId) -> &'static [Sample] {
    match tab {
        TabId::Pos => POS_SAMPLES,
        TabId::Ner => NER_SAMPLES,
        TabId::Dependency => DEPENDENCY_SAMPLES,
        TabId::Cfg => CFG_SAMPLES,
        TabId::Semantic => SEMANTIC_SAMPLES,
        TabId::Translate => TRANSLATION_SAMPLES,
        TabId::Languages => &[],
    }
}
