//! Parallel runs over a shared table.
//!
//! Every run owns its stacks and its trace, the table being only read.
use rayon::prelude::*;

use crate::{parser::traits::Parser, ParseOutcome, Trace};

/// Parse every input in parallel, the results being in the order of the inputs.
pub fn run_batch<P, I, S>(parser: &P, inputs: &[I]) -> Vec<(ParseOutcome, Trace)>
where
    P: Parser + Sync,
    I: AsRef<[S]> + Sync,
    S: AsRef<str> + Sync,
{
    inputs.par_iter().map(|input| parser.run(input.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use crate::{
        fixtures::{fixture_ll_def, fixture_lr_def},
        parser::traits::Parser as _,
        LlParser, LlTable, LrParser, LrTable,
    };

    use super::run_batch;

    #[test]
    fn test_batch_matches_sequential_runs() {
        let table = LrTable::new(fixture_lr_def()).expect("cannot build table");
        let parser = LrParser::new(&table);

        let inputs: Vec<Vec<&str>> = (0..64)
            .map(|i| {
                let mut input = vec!["n"];
                for _ in 0..(i % 7) {
                    input.extend(["+", "n"]);
                }
                if i % 5 == 0 {
                    input.push("+");
                }
                input
            })
            .collect();

        let results = run_batch(&parser, &inputs);

        assert_eq!(results.len(), inputs.len());
        for (input, result) in inputs.iter().zip(results.iter()) {
            assert_eq!(result, &parser.run(input));
        }
        assert_eq!(results.iter().filter(|(outcome, _)| outcome.is_accepted()).count(), 51);
    }

    #[test]
    fn test_batch_over_ll_table() {
        let table = LlTable::new(fixture_ll_def()).expect("cannot build table");
        let parser = LlParser::new(&table);

        let results = run_batch(&parser, &[vec!["a", "b"], vec!["b", "a"], vec![]]);
        let accepted: Vec<bool> = results.iter().map(|(outcome, _)| outcome.is_accepted()).collect();

        assert_eq!(accepted, vec![true, false, true]);
    }
}
