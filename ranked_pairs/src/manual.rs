/*!

This is the long-form manual for `ranked_pairs` and the `tideman` command line tool.

## The method

Every ballot ranks all the candidates. For every two candidates, the ballots
are counted head to head: the candidate ranked higher on more ballots wins
that pair, and the difference of the two counts is the margin. Tied pairs are
ignored.

The pairs are then sorted by decreasing margin. Pairs with the same margin are
sorted by the position of the winner in the list of candidates, then by the
position of the loser. This makes the outcome independent of the order in
which ballots were submitted.

The pairs are locked in that order. A pair is skipped if its loser already
beats its winner through a chain of locked pairs, since locking it would
create a cycle. The winner is the candidate who is never the loser of a
locked pair.

## Using `tideman`

### Interactive

The candidates are given on the command line, the ballots are typed in:

```text
$ tideman Alice Bob Charlie
Number of voters: 3
Rank 1: Alice
Rank 2: Charlie
Rank 3: Bob
...
Winner: Alice
```

A name that is not a candidate aborts the election with `Invalid vote.`. At
most 9 candidates are accepted, see `--max-candidates`.

### csv

Ballots read from a CSV file. Each row is a ballot, each cell a rank, from
the most preferred candidate to the least preferred:

```text
Alice,Charlie,Bob
Bob,Alice,Charlie
```

Run with `tideman --input ballots.csv Alice Bob Charlie`. Files with a header
row or an id column are described with a configuration file.

## Configuration

An election can be described in a JSON file passed with `--config`:

```json
{
  "outputSettings": { "contestName": "Board election" },
  "cvrFileSources": [
    {
      "provider": "csv",
      "filePath": "ballots.csv",
      "firstVoteColumnIndex": 2,
      "firstVoteRowIndex": 2,
      "idColumnIndex": 1
    }
  ],
  "candidates": [{ "name": "Alice" }, { "name": "Bob" }, { "name": "Charlie" }],
  "rules": { "maxCandidates": 9 }
}
```

Column and row indices start at 1. `firstVoteRowIndex` is the first row holding
a ballot (2 skips a header row). File paths are relative to the configuration
file.

The summary of the election is written in JSON with `--out` (a file path or
`stdout`). It lists the head-to-head counts, the pairs in locking order with
their margin and whether they were locked, and the winner. `--reference`
compares that summary to an existing one and fails if they differ.

 */
