// Interactive entry of the ballots.

use std::collections::{HashSet, VecDeque};
use std::io::{BufRead, Write};

use crate::tideman::*;

/// Splits the input into whitespace-separated words, across lines.
struct Words<'a, R: BufRead> {
    input: &'a mut R,
    pending: VecDeque<String>,
}

impl<'a, R: BufRead> Words<'a, R> {
    fn new(input: &'a mut R) -> Words<'a, R> {
        Words {
            input,
            pending: VecDeque::new(),
        }
    }

    fn next_word(&mut self) -> TidemanResult<String> {
        while self.pending.is_empty() {
            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context(ReadingBallotsSnafu {})?;
            if read == 0 {
                return Err(TidemanError::MissingInput {});
            }
            self.pending
                .extend(line.split_whitespace().map(|s| s.to_string()));
        }
        self.pending.pop_front().context(MissingInputSnafu {})
    }
}

/// Asks for the number of voters, then for the ranking of each voter.
///
/// A name that is not one of the candidates stops the entry with
/// `Invalid vote.`.
pub fn read_prompt_ballots<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    candidates: &[String],
) -> TidemanResult<Vec<ParsedBallot>> {
    let known: HashSet<&str> = candidates.iter().map(|s| s.as_str()).collect();
    let mut words = Words::new(input);

    write!(output, "Number of voters: ").context(ReadingBallotsSnafu {})?;
    output.flush().context(ReadingBallotsSnafu {})?;
    let num_voters_s = words.next_word()?;
    let num_voters: usize = match num_voters_s.parse::<usize>() {
        Ok(x) => x,
        Err(_) => whatever!("Invalid number of voters: {:?}", num_voters_s),
    };
    debug!("read_prompt_ballots: {:?} voters", num_voters);

    let mut res: Vec<ParsedBallot> = Vec::new();
    for voter in 0..num_voters {
        let mut choices: Vec<String> = Vec::with_capacity(candidates.len());
        for rank in 0..candidates.len() {
            write!(output, "Rank {}: ", rank + 1).context(ReadingBallotsSnafu {})?;
            output.flush().context(ReadingBallotsSnafu {})?;
            let name = words.next_word()?;
            if !known.contains(name.as_str()) {
                writeln!(output, "Invalid vote.").context(ReadingBallotsSnafu {})?;
                return Err(TidemanError::InvalidVote {
                    source: VotingErrors::UnknownCandidate {
                        ballot: voter,
                        name,
                    },
                });
            }
            choices.push(name);
        }
        writeln!(output).context(ReadingBallotsSnafu {})?;
        res.push(ParsedBallot {
            id: Some(format!("voter-{}", voter + 1)),
            choices,
        });
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn names(ns: &[&str]) -> Vec<String> {
        ns.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn prompts_and_ballots() {
        let mut input = Cursor::new("2\nAlice\nBob\nBob Alice\n");
        let mut output: Vec<u8> = Vec::new();
        let ballots = read_prompt_ballots(&mut input, &mut output, &names(&["Alice", "Bob"])).unwrap();
        assert_eq!(
            ballots.iter().map(|b| b.choices.clone()).collect::<Vec<_>>(),
            vec![names(&["Alice", "Bob"]), names(&["Bob", "Alice"])]
        );
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Number of voters: Rank 1: Rank 2: \nRank 1: Rank 2: \n"
        );
    }

    #[test]
    fn unknown_name() {
        let mut input = Cursor::new("1\nAlice\nZed\n");
        let mut output: Vec<u8> = Vec::new();
        let res = read_prompt_ballots(&mut input, &mut output, &names(&["Alice", "Bob"]));
        match res {
            Err(e @ TidemanError::InvalidVote { .. }) => assert_eq!(e.exit_code(), 3),
            x => panic!("unexpected result {:?}", x),
        }
        assert!(String::from_utf8(output)
            .unwrap()
            .ends_with("Invalid vote.\n"));
    }

    #[test]
    fn truncated_input() {
        let mut input = Cursor::new("3\nA B C\nB\n");
        let mut output: Vec<u8> = Vec::new();
        let res = read_prompt_ballots(&mut input, &mut output, &names(&["A", "B", "C"]));
        assert!(matches!(res, Err(TidemanError::MissingInput {})));
    }

    #[test]
    fn huge_voter_count_with_short_input() {
        let mut input = Cursor::new("18446744073709551615\nA\n");
        let mut output: Vec<u8> = Vec::new();
        let res = read_prompt_ballots(&mut input, &mut output, &names(&["A", "B"]));
        assert!(matches!(res, Err(TidemanError::MissingInput {})));
    }

    #[test]
    fn bad_voter_count() {
        let mut input = Cursor::new("many\n");
        let mut output: Vec<u8> = Vec::new();
        let res = read_prompt_ballots(&mut input, &mut output, &names(&["A"]));
        assert!(matches!(res, Err(TidemanError::Whatever { .. })));
    }
}
