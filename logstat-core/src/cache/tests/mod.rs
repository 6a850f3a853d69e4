mod recency_tests;
mod retention_tests;
