use hexword_protocol::Word;

/// Outcome of reading a word sequence as a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The whole sequence is a complete sentence.
    Valid,
    /// The sequence is a sentence prefix; more words could complete it.
    Incomplete,
    /// No extension of this sequence can ever be a sentence.
    Invalid,
}

/// Which kind of operand the words after an `AND` continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// `I AM ...`: objects
    Am,
    /// `X IS ...`: objects or properties
    Is,
    /// `... CAN ...`: abilities
    Can,
}

/// Anything in the noun range except the pronoun, which may only open an
/// `I` statement.
fn is_object(word: Word) -> bool {
    word.is_object() && word != Word::I
}

fn is_is_operand(word: Word) -> bool {
    is_object(word) || word.is_property()
}

fn is_predicate_verb(word: Word) -> bool {
    matches!(word, Word::Is | Word::Am | Word::Can)
}

/// Two verbs in a row are never grammatical. `AND` may introduce a verb
/// (`... AND CAN PUSH`) but may not follow one, nor itself.
fn is_double_verb(first: Word, second: Word) -> bool {
    (is_predicate_verb(first) && second.is_verb()) || (first == Word::And && second == Word::And)
}

/// A production either completes (`Ok`) or stops the parse with
/// `Incomplete`/`Invalid`.
type Step<T = ()> = Result<T, Verdict>;

/// Recursive-descent reader over an immutable word slice.
///
/// Lookahead is one symbol everywhere except at `AND`, where the word after
/// it is inspected before committing to a production.
struct Parser<'a> {
    words: &'a [Word],
    position: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Word> {
        self.words.get(self.position).copied()
    }

    fn peek_second(&self) -> Option<Word> {
        self.words.get(self.position + 1).copied()
    }

    fn advance(&mut self, count: usize) {
        self.position += count;
    }

    fn at_end(&self) -> bool {
        self.position >= self.words.len()
    }

    fn expect(&mut self, accepts: impl Fn(Word) -> bool) -> Step<Word> {
        match self.peek() {
            None => Err(Verdict::Incomplete),
            Some(word) if accepts(word) => {
                self.advance(1);
                Ok(word)
            }
            Some(_) => Err(Verdict::Invalid),
        }
    }

    /// The word following an `AND` at the cursor. Running out here means the
    /// conjunction is still waiting for its operand.
    fn after_and(&self) -> Step<Word> {
        self.peek_second().ok_or(Verdict::Incomplete)
    }

    fn sentence(&mut self) -> Step {
        match self.peek() {
            None => Err(Verdict::Incomplete),
            Some(Word::I) => self.i_statement(),
            Some(word) if is_object(word) => self.o_statement(),
            Some(_) => Err(Verdict::Invalid),
        }
    }

    fn i_statement(&mut self) -> Step {
        self.expect(|w| w == Word::I)?;
        let mut mode = self.i_clause()?;

        while self.peek() == Some(Word::And) {
            match self.after_and()? {
                Word::I => {
                    self.advance(2);
                    mode = self.i_clause()?;
                }
                Word::Am | Word::Can => {
                    self.advance(1);
                    mode = self.i_clause()?;
                }
                word if mode == Mode::Am && is_object(word) => self.advance(2),
                word if mode == Mode::Can && word.is_ability() => self.advance(2),
                _ => return Err(Verdict::Invalid),
            }
        }
        Ok(())
    }

    /// `AM OBJECT` or `CAN ABILITY`.
    fn i_clause(&mut self) -> Step<Mode> {
        match self.expect(|w| w == Word::Am || w == Word::Can)? {
            Word::Am => {
                self.expect(is_object)?;
                Ok(Mode::Am)
            }
            _ => {
                self.expect(Word::is_ability)?;
                Ok(Mode::Can)
            }
        }
    }

    fn o_statement(&mut self) -> Step {
        self.expect(is_object)?;

        // Subject list: an AND here must be followed by another object.
        while self.peek() == Some(Word::And) {
            if !is_object(self.after_and()?) {
                return Err(Verdict::Invalid);
            }
            self.advance(2);
        }

        let mut mode = self.o_clause()?;

        while self.peek() == Some(Word::And) {
            match self.after_and()? {
                Word::Is | Word::Can => {
                    self.advance(1);
                    mode = self.o_clause()?;
                }
                word if mode == Mode::Is && is_is_operand(word) => self.advance(2),
                word if mode == Mode::Can && word.is_ability() => self.advance(2),
                _ => return Err(Verdict::Invalid),
            }
        }
        Ok(())
    }

    /// `IS (OBJECT | PROPERTY)` or `CAN ABILITY`.
    fn o_clause(&mut self) -> Step<Mode> {
        match self.expect(|w| w == Word::Is || w == Word::Can)? {
            Word::Is => {
                self.expect(is_is_operand)?;
                Ok(Mode::Is)
            }
            _ => {
                self.expect(Word::is_ability)?;
                Ok(Mode::Can)
            }
        }
    }
}

/// Parse `words` and report how many of them the grammar consumed.
///
/// A sentence that completes before the input runs out is `Invalid`: the
/// shorter sentence is found separately by the phrase search.
pub fn parse_with_count(words: &[Word]) -> (Verdict, usize) {
    if words.is_empty() {
        return (Verdict::Invalid, 0);
    }
    if let Some(at) = words.windows(2).position(|pair| is_double_verb(pair[0], pair[1])) {
        return (Verdict::Invalid, at + 1);
    }

    let mut parser = Parser { words, position: 0 };
    let verdict = match parser.sentence() {
        Ok(()) if parser.at_end() => Verdict::Valid,
        Ok(()) => Verdict::Invalid,
        Err(verdict) => verdict,
    };
    (verdict, parser.position)
}

pub fn parse(words: &[Word]) -> Verdict {
    parse_with_count(words).0
}
