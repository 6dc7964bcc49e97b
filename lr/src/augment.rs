use grammar::{NonterminalIdGen, TokenIdGen};
use grammar::{Grammar, NonterminalMetadata, Production, Symbol, TokenId};

/// Add `S' -> S` to grammar, where `S` is the start symbol, together with a
/// new token `$` representing EOF. The new production is the last one and its
/// head becomes the start symbol.
pub fn augment(grammar: Grammar) -> (Grammar, TokenId) {
  let mut nt_id_gen = NonterminalIdGen::new(grammar.num_nts() as u32);
  let mut token_id_gen = TokenIdGen::new(grammar.num_tokens() as u32);
  let eof_token = token_id_gen.gen();

  let Grammar {
    mut prods,
    mut tokens,
    mut nts,
    mut nt_metas,
    start_nt,
  } = grammar;

  let new_start_nt = nt_id_gen.gen();
  let mut new_nt_name = format!("{}'", nts.get_by_left(&start_nt).map(|s| s.as_str()).unwrap_or("S"));
  while nts.contains_right(&new_nt_name) {
    new_nt_name.push('\'');
  }

  let start = prods.len();
  prods.push(Production {
    nt: new_start_nt,
    symbols: vec![Symbol::Nonterminal(start_nt)],
  });

  nt_metas.insert(new_start_nt, NonterminalMetadata {
    prods: vec![start],
  });
  nts.insert(new_start_nt, new_nt_name);
  let mut eof_name = "$".to_owned();
  while tokens.contains_right(&eof_name) {
    eof_name.push('$');
  }
  tokens.insert(eof_token, eof_name);

  let grammar = Grammar {
    prods,
    tokens,
    nts,
    nt_metas,
    start_nt: new_start_nt,
  };

  (grammar, eof_token)
}
