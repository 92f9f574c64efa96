mod tests_diagrams;
mod tests_errors;
mod tests_profiles;
mod tests_reimport;
mod tests_structure;
