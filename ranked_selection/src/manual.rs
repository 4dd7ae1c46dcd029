/*!

This is the long-form manual for `ranked_selection` and `rankballot`.

## Ranks and positions

A ballot is a list of candidates. Each candidate has a position in the list and,
optionally, a rank. Rank `0` is the first choice (displayed as `1`). A contest
allows a fixed number of ranks (`maxRank`); once they are all given out, the
ballot is *full* and unranked candidates cannot be selected until a rank is freed.

Selecting an unranked candidate gives it the smallest free rank. Selecting a
ranked candidate frees its rank. The other candidates keep their ranks, so a
freed rank in the middle of the ballot is handed out again by the next selection.

The position of a candidate in the list and its rank are independent. Putting the
ballot in rank order is an explicit action (`sort`).

## Moving candidates

There are two families of moves, selected by the *move mode*:

| mode       | up control          | down control         | list moves? | ranks move?          |
|------------|---------------------|----------------------|-------------|----------------------|
| `position` | `move_up`           | `move_down`          | yes         | stay with positions  |
| `rank`     | `raise_rank`        | `lower_rank`         | no          | exchanged            |

With `position`, the candidate trades places with the closest ranked candidate
above (or below) it, skipping unranked candidates. Each position keeps its rank,
so the two candidates also trade ranks.

With `rank`, the candidate trades rank values with the candidate holding the next
rank in use, without moving in the list. Gaps between the ranks in use are skipped.

In both modes the controls are hidden on unranked candidates. With `position` they
are also hidden on the first (up) and last (down) ranked positions; with `rank`, on
the highest (up) and lowest (down) ranks.

Dragging a candidate is a third way to reorder: the dragged candidate trades places
with the candidate under it, and when the drag is committed each position gets back
the rank it held when the drag started.

## Command-line driver

`rankballot` replays a session on a contest and prints the final state of the ballot.

```bash
rankballot --config contest.json --commands session.json --out stdout
```

The contest description:

```text
{
  "contestName": "Favourite characters",
  "maxRank": 3,
  "controlType": "adjudicated",
  "moveType": "rank",
  "candidates": [
    {"id": "candidate-0", "name": "Bandit Heeler", "party": "Bluey Party"},
    {"name": "Egon Targarian"}
  ]
}
```

- `maxRank` (number, required): the number of ranks.
- `controlType` (string, optional): only `adjudicated` is supported.
- `moveType` (`rank` or `position`, optional, default `rank`): the initial move mode.
- `candidates` (array, required): `id` defaults to `candidate-<index>`, `party` is optional,
  `rank` (0-based) may be given to resume a ballot.
- `commands` (array, optional): the session to replay when `--commands` is not given.

The session is an array of commands:

```text
[
  {"command": "select", "position": 0},
  {"command": "selectId", "id": "candidate-2"},
  {"command": "pressDown", "position": 0},
  {"command": "setMode", "mode": "position"},
  {"command": "beginReorder"},
  {"command": "updatePosition", "id": "candidate-2", "position": 0},
  {"command": "commitLive"},
  {"command": "sort"}
]
```

Other commands: `moveUp`, `moveDown`, `raiseRank`, `lowerRank`, `pressUp` (all with a
`position`; the rank is read from the ballot), `commitReorder` (with an `order` array of
ids) and `cancelReorder`.

With `--reference <file>`, the output is compared with an expected summary and the
differences are printed.

 */
