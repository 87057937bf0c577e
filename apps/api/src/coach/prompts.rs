// Prompt constants for the LLM coach.
// System prompts are assembled with llm_client::prompts::system_prompt.

pub const QUESTIONS_TASK: &str = "Write interview questions for a specific job.";

/// Replace: {job_title}, {job_description}, {keywords_json}, {count}
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"Write exactly {count} interview questions for this role.

JOB TITLE: {job_title}

JOB DESCRIPTION:
{job_description}

SKILLS DETECTED IN THE DESCRIPTION:
{keywords_json}

Mix technical questions about the detected skills, behavioral questions that
invite a STAR-style answer (Situation, Task, Action, Result), and questions
specific to the job title.

Return a JSON object with this EXACT schema:
{
  "questions": ["Tell me about your experience with ...", "..."]
}"#;

pub const FOLLOW_UP_TASK: &str =
    "React to the candidate's last answer and ask the next interview question.";

/// Replace: {job_title}, {job_description}, {current_question}, {answer}, {previous_json}
pub const FOLLOW_UP_PROMPT_TEMPLATE: &str = r#"JOB TITLE: {job_title}

JOB DESCRIPTION:
{job_description}

QUESTIONS ALREADY ASKED:
{previous_json}

LAST QUESTION:
{current_question}

CANDIDATE'S ANSWER:
{answer}

Give one or two sentences of feedback on the answer, then ask ONE follow-up
question that explores a skill from the job description not yet covered.
Do not repeat a question already asked.

Return a JSON object with this EXACT schema:
{
  "feedback": "Good use of a concrete example ...",
  "question": "How have you ...?"
}"#;

pub const REPORT_TASK: &str = "Evaluate a completed mock interview and write a performance report.";

/// Replace: {job_title}, {job_description}, {interview_json}
pub const REPORT_PROMPT_TEMPLATE: &str = r#"JOB TITLE: {job_title}

JOB DESCRIPTION:
{job_description}

INTERVIEW TRANSCRIPT (question / answer pairs):
{interview_json}

Score every answer from 0 to 100 for relevance, depth, and clarity, then
score the whole interview. All scores are integers from 0 to 100.

Return a JSON object with this EXACT schema:
{
  "overall_score": 74,
  "breakdown": {
    "overall": 74,
    "technical": 70,
    "communication": 80,
    "problem_solving": 71
  },
  "strengths": ["at least three items"],
  "improvements": ["at least three items"],
  "recommendations": ["at least three items, one per improvement"],
  "question_analysis": [
    {"question": "the exact question text", "score": 80, "feedback": "one or two sentences"}
  ]
}

question_analysis MUST contain one entry per transcript item, in order."#;
