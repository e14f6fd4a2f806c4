mod domain_tests;
mod photo_tests;
