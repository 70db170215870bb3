mod deposit;
