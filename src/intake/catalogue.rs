//! Static content shown during the application: the proficiency exam, the
//! timed writing prompts and the essay topics.
//!
//! Answers are graded by the backend; the client only records which option
//! was picked for each question.

/// Number of options every exam question offers.
pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamQuestion {
    pub prompt: &'static str,
    pub options: [&'static str; OPTIONS_PER_QUESTION],
}

pub const EXAM_QUESTIONS: [ExamQuestion; 30] = [
    ExamQuestion {
        prompt: "Choose the correctly punctuated sentence.",
        options: [
            "However the results were inconclusive.",
            "However, the results were inconclusive.",
            "However; the results were inconclusive.",
            "However: the results were inconclusive.",
        ],
    },
    ExamQuestion {
        prompt: "Which word completes the sentence? \"The data ___ collected over six months.\"",
        options: ["was", "were", "is being", "has"],
    },
    ExamQuestion {
        prompt: "Select the correct form: \"Neither the author nor the editors ___ aware.\"",
        options: ["was", "were", "is", "has been"],
    },
    ExamQuestion {
        prompt: "Which citation style uses author-date in-text citations such as (Smith, 2020)?",
        options: ["MLA", "APA", "Chicago notes-bibliography", "IEEE"],
    },
    ExamQuestion {
        prompt: "Choose the correct word: \"The policy had a significant ___ on enrolment.\"",
        options: ["affect", "effect", "effectt", "affectation"],
    },
    ExamQuestion {
        prompt: "Which sentence avoids a dangling modifier?",
        options: [
            "Walking into the lab, the smell was overwhelming.",
            "Walking into the lab, I noticed an overwhelming smell.",
            "Walking into the lab, overwhelming was the smell.",
            "The smell, walking into the lab, was overwhelming.",
        ],
    },
    ExamQuestion {
        prompt: "What is the main purpose of a thesis statement?",
        options: [
            "To list every source used",
            "To state the central argument of the paper",
            "To summarise the conclusion in detail",
            "To introduce the author",
        ],
    },
    ExamQuestion {
        prompt: "Choose the correct plural: \"Several ___ were proposed.\"",
        options: ["hypothesis", "hypothesises", "hypotheses", "hypothesi"],
    },
    ExamQuestion {
        prompt: "Which is an example of passive voice?",
        options: [
            "The committee approved the budget.",
            "The budget was approved by the committee.",
            "The committee is approving the budget.",
            "The committee will approve the budget.",
        ],
    },
    ExamQuestion {
        prompt: "Select the word that best replaces \"use\" in formal writing: \"Researchers use surveys.\"",
        options: ["employ", "grab", "try out", "go with"],
    },
    ExamQuestion {
        prompt: "Which sentence is grammatically correct?",
        options: [
            "Its a well known theory.",
            "It's a well-known theory.",
            "Its' a well-known theory.",
            "It's a well known' theory.",
        ],
    },
    ExamQuestion {
        prompt: "What does \"et al.\" indicate in a citation?",
        options: [
            "The source is undated",
            "There are additional authors",
            "The page number is unknown",
            "The source is translated",
        ],
    },
    ExamQuestion {
        prompt: "Choose the correct preposition: \"The results are consistent ___ earlier studies.\"",
        options: ["to", "with", "for", "by"],
    },
    ExamQuestion {
        prompt: "Which transition signals contrast?",
        options: ["Furthermore", "Consequently", "Nevertheless", "Similarly"],
    },
    ExamQuestion {
        prompt: "Identify the sentence fragment.",
        options: [
            "The study was limited in scope.",
            "Because the sample size was small.",
            "The sample size was small, so results varied.",
            "Results varied across groups.",
        ],
    },
    ExamQuestion {
        prompt: "Which option is the correct spelling?",
        options: ["occured", "occurred", "ocurred", "occurrred"],
    },
    ExamQuestion {
        prompt: "What is plagiarism?",
        options: [
            "Quoting a source with proper citation",
            "Presenting another person's work as your own",
            "Paraphrasing with attribution",
            "Summarising your own earlier work with citation",
        ],
    },
    ExamQuestion {
        prompt: "Choose the correct comparative: \"This method is ___ than the previous one.\"",
        options: [
            "more efficient",
            "efficienter",
            "most efficient",
            "more efficienter",
        ],
    },
    ExamQuestion {
        prompt: "Which sentence uses a semicolon correctly?",
        options: [
            "The trial ended; and the results were published.",
            "The trial ended; the results were published soon after.",
            "The trial; ended the results were published.",
            "The trial ended the; results were published.",
        ],
    },
    ExamQuestion {
        prompt: "What should a literature review primarily do?",
        options: [
            "Present new experimental data",
            "Synthesise and evaluate existing research",
            "List sources alphabetically without comment",
            "Argue the author's personal opinion only",
        ],
    },
    ExamQuestion {
        prompt: "Select the correct pronoun: \"Each participant submitted ___ form.\"",
        options: ["their own", "its", "they're", "there"],
    },
    ExamQuestion {
        prompt: "Which word is a synonym of \"ubiquitous\"?",
        options: ["rare", "widespread", "ambiguous", "temporary"],
    },
    ExamQuestion {
        prompt: "Which is the most concise revision of \"due to the fact that\"?",
        options: [
            "because",
            "owing to the fact that",
            "in view of the fact that",
            "on account of the fact",
        ],
    },
    ExamQuestion {
        prompt: "Choose the correct sentence.",
        options: [
            "Fewer students attended this year.",
            "Less students attended this year.",
            "Lesser students attended this year.",
            "Fewest students attended this year.",
        ],
    },
    ExamQuestion {
        prompt: "In APA style, where does the reference list appear?",
        options: [
            "At the start of the paper",
            "In footnotes on each page",
            "At the end of the paper",
            "After the abstract",
        ],
    },
    ExamQuestion {
        prompt: "Which sentence shows correct subject-verb agreement?",
        options: [
            "The list of items are on the desk.",
            "The list of items is on the desk.",
            "The list of items were on the desk.",
            "The list of items be on the desk.",
        ],
    },
    ExamQuestion {
        prompt: "What is the purpose of an abstract?",
        options: [
            "To thank contributors",
            "To provide a brief summary of the whole work",
            "To list the raw data",
            "To present the bibliography",
        ],
    },
    ExamQuestion {
        prompt: "Choose the correct word: \"The professor will ___ the essays by Friday.\"",
        options: ["asses", "assess", "access", "acess"],
    },
    ExamQuestion {
        prompt: "Which option correctly uses a colon?",
        options: [
            "The study had three aims: accuracy, speed, and cost.",
            "The study had: three aims accuracy, speed, and cost.",
            "The: study had three aims.",
            "The study had three: aims.",
        ],
    },
    ExamQuestion {
        prompt: "Which is the best way to integrate a quotation?",
        options: [
            "Drop it in without introduction",
            "Introduce it, cite it, and explain its relevance",
            "Paraphrase it without citation",
            "Place it only in the conclusion",
        ],
    },
];

/// Number of questions that must be answered.
pub const EXAM_QUESTION_COUNT: usize = EXAM_QUESTIONS.len();

/// A selectable topic for the timed writing steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topic {
    pub id: &'static str,
    pub title: &'static str,
}

pub const WRITING_PROMPTS: [Topic; 4] = [
    Topic {
        id: "remote-learning",
        title: "Describe one advantage and one drawback of remote learning.",
    },
    Topic {
        id: "source-evaluation",
        title: "Explain how you decide whether an online source is credible.",
    },
    Topic {
        id: "deadline-pressure",
        title: "Describe how you would handle two urgent orders due the same day.",
    },
    Topic {
        id: "feedback",
        title: "Explain how you respond to critical feedback from a client.",
    },
];

pub const ESSAY_TOPICS: [Topic; 4] = [
    Topic {
        id: "ai-in-education",
        title: "Should generative AI tools be permitted in university coursework?",
    },
    Topic {
        id: "urban-green-space",
        title: "Assess the public health value of urban green space.",
    },
    Topic {
        id: "four-day-week",
        title: "Evaluate the economic case for a four-day working week.",
    },
    Topic {
        id: "social-media-politics",
        title: "Discuss the influence of social media on political participation.",
    },
];

pub fn find_prompt(id: &str) -> Option<&'static Topic> {
    WRITING_PROMPTS.iter().find(|t| t.id == id)
}

pub fn find_essay_topic(id: &str) -> Option<&'static Topic> {
    ESSAY_TOPICS.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exam_has_thirty_four_option_questions() {
        assert_eq!(EXAM_QUESTION_COUNT, 30);
        for (i, question) in EXAM_QUESTIONS.iter().enumerate() {
            assert!(!question.prompt.is_empty(), "question {i} has no prompt");
            assert!(question.options.iter().all(|o| !o.is_empty()));
        }
    }

    #[test]
    fn topic_lookup() {
        assert!(find_prompt("feedback").is_some());
        assert!(find_prompt("nope").is_none());
        assert_eq!(find_essay_topic("four-day-week").unwrap().id, "four-day-week");
    }
}
