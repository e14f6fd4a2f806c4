mod journal_workflow;
mod concurrent_writes;
