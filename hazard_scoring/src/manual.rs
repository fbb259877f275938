/*!

This is the long-form manual for `hazard_scoring` and `hazrank`.

## Input tables

A survey is made of four tables. Each of them is a tabular source with a
header row: a CSV file or an Excel worksheet (`.xlsx`). The first three are
required. The exposure table is optional: when it is missing or cannot be
read, the exposure axis is simply not available.

Rows that cannot be used are dropped and reported with their line number.
They never stop the survey.

### `attributes`

| column           | required | notes                                      |
|------------------|----------|--------------------------------------------|
| `id`             | no       | also read from `attribute_id`; else `ATTR_{n}` with `n` the row number |
| `category`       | no       | `Other` when blank                         |
| `attribute_text` | yes      | the question shown to the respondent       |

The order of the rows is the order of the survey.

### `hazards`

| column                | required | notes                         |
|-----------------------|----------|-------------------------------|
| `Hazard Code`         | yes      | also the key of the other tables |
| `Hazard Descriptions` | no       | the code is used when blank   |

The order of the rows breaks ties in the ranking.

### `hazard_attribute_scores`

```text
hazard_id,attribute_id,score_letter
WF,A1,D
WF,A2,B
```

All three columns are required. Letters are read without regard to case or
surrounding spaces. Letters that the relevance scale does not know count as 0.

### `exposure`

```text
Code,1,2,3,4,5,Lands1,Lands2,Lands3,Lands4,Lands5,Personnel1,...
WF,3,,1,N/A,,2,,4,,,
```

For every asset category, the columns `{prefix}1` to `{prefix}5` hold the
number of assets at each level. The index of the category is
`1 x count1 + 2 x count2 + ... + 5 x count5`. Blank, `N/A` and non-numeric
cells are skipped. A category whose index is not positive is not recorded for
that hazard. The default categories are `All assets` (bare columns `1` to
`5`), `Lands`, `Personnel` and `Buildings`.

## Answers

The importance of each attribute, from 1 (not important) to 5 (very
important). Attributes without an answer count as 3. The answers file is
either a JSON object:

```text
{ "A1": 5, "A2": 1 }
```

or a CSV file with the columns `attribute_id` and `importance`.

## Relevance scales

| scale      | A | B | C | D | E |
|------------|---|---|---|---|---|
| `planning` | 0 | 1 | 3 | 5 | 5 |
| `linear`   | 1 | 2 | 3 | 4 | 5 |

`planning` is the default. Any other table can be given in the configuration
as an object, for example `{"A": 0, "B": 1, "C": 2, "D": 4, "E": 8}`.

## Profiles

| key        | weights                                      |
|------------|----------------------------------------------|
| `all`      | every category counts once                   |
| `hazard`   | `Hazard` only                                |
| `response` | `Preparedness` and `Response` only           |
| `recovery` | `Recovery` only                              |
| `people`   | `People` and `Community` count twice, the rest once |

The configuration may replace this catalogue. `all` always exists and always
weighs every category equally. Unknown profile keys behave like `all`.

## Configuration

```text
{
  "tables": {
    "attributes": { "provider": "csv", "filePath": "attributes.csv" },
    "hazards": { "provider": "xlsx", "filePath": "hazards.xlsx", "worksheetName": "Hazards" },
    "relevance": { "provider": "csv", "filePath": "hazard_attribute_scores.csv" },
    "exposure": { "provider": "csv", "filePath": "exposure.csv" }
  },
  "relevanceScale": "planning",
  "answers": "answers.json",
  "profile": "all",
  "exposureMetric": "Lands"
}
```

Paths are relative to the configuration file. The command line options
override the values of the file.

## Export

The CSV export has the columns `Rank, Hazard Code, Hazard Name, Score, Band`
and, when an exposure metric is available, `Exposure(<metric>)` with the raw
index. It always contains every hazard, whatever the number of rows shown on
the terminal.

 */
