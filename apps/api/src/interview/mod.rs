// Interview API: create an interview, answer questions one at a time, then
// close it out with a performance report. All question/feedback/report text
// comes from the coach (LLM first, heuristic engine as fallback).

pub mod handlers;
pub mod store;
